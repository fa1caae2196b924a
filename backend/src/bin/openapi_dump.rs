//! Print the OpenAPI document as JSON.

use color_eyre::eyre::WrapErr;
use user_registry::ApiDoc;
use utoipa::OpenApi;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let json = ApiDoc::openapi()
        .to_pretty_json()
        .wrap_err("serialise OpenAPI document")?;
    println!("{json}");
    Ok(())
}
