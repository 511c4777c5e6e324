use keeptab::ui;

#[tokio::main]
async fn main() {
    if let Err(err) = keeptab::cli::run().await {
        ui::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
