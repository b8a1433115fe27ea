use folio_shell::Result;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Optional starting path, e.g. `folio /fr/projects`.
    let initial_path = std::env::args().nth(1).unwrap_or_else(|| "/".to_string());

    let app = folio_shell::run(&initial_path).await?;
    let router = app.router();
    log::info!(
        "Resolved '{}' -> {}/{} (url {})",
        initial_path,
        router.current_language(),
        router.current_page(),
        router.build_url(&router.current_language(), &router.current_page())
    );
    app.shutdown();
    Ok(())
}
