mod common;
use common::get_client;
use datalink::{Order, Params, Selector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = get_client()?;

    // Two series plus one that does not exist: the missing one contributes a
    // "Not Found" column instead of failing the merge.
    let selector = Selector::parse_many(&["WIKI/AAPL.1", "WIKI/MSFT.1", "NSE/MISSING"])?;
    let merged = client
        .get(selector, Params::new().ordered(Order::Desc))
        .await?;

    println!("Columns: {:?}", merged.columns());
    for row in merged.rows() {
        let cells: Vec<String> = row.iter().map(ToString::to_string).collect();
        println!(" - {}", cells.join(" | "));
    }
    println!(
        "Span: {:?} .. {:?}",
        merged.meta().start(),
        merged.meta().end()
    );

    Ok(())
}
