use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::cli::utils::open_pool;
use crate::services::{savings_to_csv, ReportService};

#[derive(Subcommand)]
pub enum ReportCommands {
    #[command(about = "Savings negotiated during SAC review")]
    Savings {
        #[arg(long, help = "Write CSV instead of a table")]
        csv: bool,
    },
}

pub async fn handle(cmd: ReportCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let pool = open_pool().await?;
    let reports = ReportService::new(pool.clone());

    match cmd {
        ReportCommands::Savings { csv } => {
            let report = reports.savings().await?;
            pool.close().await;

            if csv {
                print!("{}", savings_to_csv(&report));
                return Ok(());
            }

            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                OutputFormat::Text => {
                    for line in &report.rows {
                        println!(
                            "{}  {:<24} {:<16} {:>10.2} -> {:>10.2}  saved {:.2}",
                            line.row.date, line.row.item, line.row.vendor, line.row.initial_cost, line.row.amount, line.savings
                        );
                    }
                    println!("Total savings: {:.2}", report.total_savings);
                }
            }
            Ok(())
        }
    }
}
