#[cfg(feature = "http_api")]
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use std::net::SocketAddr;

    use project_accessor::{FileAccessor, http_api, logging};

    logging::init_logging();

    let addr: SocketAddr = std::env::var("PROJECT_ACCESSOR_HTTP_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
        .parse()?;
    let document = std::env::var("PROJECT_ACCESSOR_DOCUMENT")
        .unwrap_or_else(|_| "project.json".to_string());

    let accessor = FileAccessor::open_or_create(&document)?;
    println!("project-accessor HTTP API serving {document} on http://{addr}");
    http_api::serve(addr, accessor).await?;
    Ok(())
}

#[cfg(not(feature = "http_api"))]
fn main() {
    eprintln!("Rebuild with the `http_api` feature to enable the HTTP server.");
}
