mod common;
use common::get_client;
use datalink::{Params, Selector};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Build a client (mock in CI when DATALINK_EXAMPLES_USE_MOCK is set).
    let client = get_client()?;

    // 2. Fetch one series, narrowed server-side to its first value column.
    let selector = Selector::parse("NSE/OIL.1")?;
    let series = client.get(selector, Params::new().rows(5)).await?;

    // 3. Print the result as a keyed table.
    let table = series.to_table();
    println!(
        "{} rows, key axis {:?}, columns {:?}",
        table.len(),
        table.index_name(),
        table.columns()
    );
    print!("{}", series.to_csv()?);

    Ok(())
}
