mod common;
use common::get_client;
use datalink::Params;
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = get_client()?;

    // Follow every cursor; soft limits come back as warnings next to the rows.
    let table = client
        .table("ZACKS/FC")
        .params(
            Params::new()
                .with("ticker", json!(["AAPL", "MSFT"]))
                .columns(["per_end_date", "ticker", "tot_oper_exp"]),
        )
        .paginate(true)
        .run()
        .await?;

    println!("{} rows over {:?}", table.len(), table.columns());
    for w in table.warnings() {
        println!("warning: {w}");
    }

    Ok(())
}
