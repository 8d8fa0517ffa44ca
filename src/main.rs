use std::path::{Path, PathBuf};

use clap::Parser;

use odosetup::{AppError, SummaryFormat};

#[derive(Parser)]
#[command(name = "odosetup")]
#[command(version)]
#[command(
    about = "Materialize a parameterized Odoo 17 client deployment bundle",
    long_about = None
)]
struct Cli {
    /// Path to the key=value configuration file
    config: Option<PathBuf>,

    /// Template directory (defaults to "{client_name}-odoo-17-setup" in the
    /// current directory)
    #[arg(short, long)]
    template: Option<PathBuf>,

    /// Print the resolved-configuration summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    let config_file = match cli.config {
        Some(path) => path,
        None => match odosetup::find_existing_config(Path::new(".")) {
            Some(found) => {
                println!("Found existing configuration file: {}", found.display());
                println!("Using this file. To use a different file, specify it as an argument.");
                found
            }
            None => {
                let sample = PathBuf::from("odoo-setup.conf");
                if let Err(e) = odosetup::write_sample_config(&sample) {
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
                println!("A sample configuration file has been created: {}", sample.display());
                println!("Edit this file and run odosetup again.");
                std::process::exit(1);
            }
        },
    };

    let format = if cli.json { SummaryFormat::Json } else { SummaryFormat::Plain };
    let result: Result<_, AppError> =
        odosetup::generate(&config_file, cli.template.as_deref(), format);

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
