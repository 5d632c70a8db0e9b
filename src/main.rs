use std::{fs, path::PathBuf, process::ExitCode, str::FromStr};

use clap::Parser;
use dotenv::dotenv;

use equipment_tables::{
    aggregate::compile_pages,
    cache::read_pages,
    config::Config,
    definitions::Category,
    render::render_category,
    wikitext::Result,
};

#[derive(Parser)]
#[command(
    name = "equipment_tables",
    about = "Build per-tier equipment tables from cached wiki pages"
)]
struct Cli {
    /// Category to render, e.g. `Magick Bows` (words are joined with spaces)
    category: Vec<String>,
    /// Directory holding the cached page exports
    #[arg(long)]
    cache: Option<PathBuf>,
    /// Also write the compiled items as JSON to this file
    #[arg(long)]
    dump: Option<PathBuf>,
}

fn run(category: Category, config: &Config) -> Result<String> {
    let pages = read_pages(&config.cache_dir)?;
    let items = compile_pages(pages).take(category);

    if let Some(path) = &config.dump_path {
        fs::write(path, serde_json::to_string_pretty(&items)?)?;
        log::info!("Wrote {} compiled items to {:?}", items.len(), path);
    }

    Ok(render_category(category, items))
}

fn main() -> ExitCode {
    dotenv().ok();
    env_logger::init();

    let cli = Cli::parse();
    let requested = cli.category.join(" ");
    let requested = requested.trim();

    let category = match Category::from_str(requested) {
        Ok(category) => category,
        Err(_) => {
            println!("{}", Category::unknown_message(requested));
            return ExitCode::FAILURE;
        }
    };

    let mut builder = Config::builder_from_env();
    if let Some(cache) = cli.cache {
        builder.cache_dir(cache);
    }
    if let Some(dump) = cli.dump {
        builder.dump_path(dump);
    }

    let output = Config::finish(&builder).and_then(|config| run(category, &config));
    match output {
        Ok(text) => {
            print!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::error!("Failed to build {} tables: {}", category, e);
            ExitCode::FAILURE
        }
    }
}
