use clap::Parser;
use gantt_chart::adapters::typeset;
use gantt_chart::utils::{logger, validation::Validate};
use gantt_chart::{ChartBuilder, CliConfig, LocalStorage, PlotRenderer, SystemViewer};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting gantt-chart");
    tracing::debug!("CLI config: {:?}", config);

    let style = match config.style_config().and_then(|style| {
        style.validate()?;
        Ok(style)
    }) {
        Ok(style) => style,
        Err(e) => {
            tracing::error!("❌ Configuration validation failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(e.exit_code());
        }
    };

    let text_mode = style.text.mode.resolve(typeset::detect_text_mode);
    tracing::debug!("Text mode: {:?}", text_mode);

    let output = config.output(&style);
    let builder = ChartBuilder::new(
        LocalStorage::default(),
        PlotRenderer::new(),
        style.render_options(text_mode),
    );

    match builder.run(&config.data, &output, &SystemViewer::new()) {
        Ok(Some(path)) => {
            tracing::info!("✅ Chart rendered");
            println!("📁 Chart saved to: {}", path);
        }
        Ok(None) => tracing::info!("✅ Chart displayed"),
        Err(e) => {
            tracing::error!("❌ Chart generation failed: {} (Category: {:?})", e, e.category());
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());
            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
