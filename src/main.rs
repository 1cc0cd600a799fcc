use rtl_spect::SpectConfig;

fn main() -> eframe::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    rtl_spect::run_spect(SpectConfig::default())
}
