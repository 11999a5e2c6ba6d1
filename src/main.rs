use clap::{Arg, ArgAction, Command};
use sleep_remover::{
    Config, ReqwestSource, RunOptions, WikiLanguageTable, download_step, process_step,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("sleep-remover")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Sleep Remover - Process Minecraft language files")
        .arg(
            Arg::new("output-path")
                .long("output-path")
                .short('o')
                .help("Output namespace path of the resource pack for the language files")
                .required(true),
        )
        .arg(
            Arg::new("skip-download")
                .long("skip-download")
                .short('s')
                .help("Skip downloading language files (use existing cache)")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("cache-dir")
                .long("cache-dir")
                .short('c')
                .help("Directory holding the downloaded language files (default: .cache/languages)"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .help("Show per-file progress")
                .action(ArgAction::SetTrue),
        )
        .get_matches();

    let default_level = if matches.get_flag("verbose") {
        "debug"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .init();

    let output_path = matches
        .get_one::<String>("output-path")
        .map(PathBuf::from)
        .ok_or("--output-path is required")?;
    let options = RunOptions {
        output_path,
        skip_download: matches.get_flag("skip-download"),
    };

    let mut config = Config::from_env()?;
    if let Some(dir) = matches.get_one::<String>("cache-dir") {
        config = config.with_cache_dir(dir);
    }

    println!("Sleep Remover - Processing Minecraft language files");
    println!(
        "Output namespace path of the resource pack for the language files: {}",
        options.output_path.display()
    );

    let source = ReqwestSource::new(config.limits.request_timeout)?;
    let table = WikiLanguageTable::default();

    if options.skip_download {
        println!("\nSkipping download (using existing cache)");
    } else {
        println!("\nStep 1: Downloading language files...");
    }
    if let Some(download) = download_step(&source, &config, &options).await? {
        println!(
            "Successfully downloaded {}/{} language files",
            download.downloaded, download.found
        );
        println!(
            "Language files saved to: {}",
            absolute(&download.cache_dir).display()
        );
    }

    println!("\nStep 2: Processing sleep messages...");
    let process = process_step(&source, &table, &config, &options).await?;
    println!("Processed {} language files", process.processed);
    println!("Output saved to: {}", absolute(&process.output_dir).display());

    if process.is_clean() {
        println!("\n✅ All files processed successfully - no unmodified placeholders found!");
    } else {
        println!(
            "\n⚠️  WARNING: Found {} files with unmodified placeholders:",
            process.unrewritten.len()
        );
        for entry in &process.unrewritten {
            println!("  - {}: {}", entry.code, entry.message);
        }
    }

    println!(
        "\nCompleted! Language files saved to: {}",
        options.lang_dir().display()
    );

    Ok(())
}

fn absolute(path: &std::path::Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
