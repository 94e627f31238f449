// Copyright 2025 dentsusoken
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use clap::{Parser, Subcommand};
use std::io::IsTerminal;
use std::path::PathBuf;
use tlb_kiosk::commands::config::ConfigCommand;
use tlb_kiosk::commands::demo::DemoCommand;
use tlb_kiosk::commands::shell::ShellCommand;
use tlb_kiosk::config::{KioskConfig, resolve_home};
use tlb_kiosk::error::{Result, format_error_with_color, get_exit_code};
use tlb_kiosk::logging;

#[derive(Parser)]
#[command(name = "tlb-kiosk")]
#[command(
    author,
    version,
    about = "Kiosk lock and alert bridge for TLB Diamond",
    long_about = None
)]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Kiosk home directory (defaults to $TLB_KIOSK_HOME or ~/.tlb-kiosk)
    #[arg(long, value_name = "DIR", global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the lock lifecycle walkthrough
    Demo,

    /// Drive the lock controller and modal host interactively
    Shell {
        /// SIM identity registered for this device
        #[arg(long, value_name = "ICCID")]
        sim: Option<String>,
    },

    /// Show the effective configuration
    Config {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    logging::setup_logger(cli.verbose);

    let result: Result<()> = (|| {
        let home = resolve_home(cli.home.as_deref())?;
        let config = KioskConfig::load(&home)?;

        match cli.command {
            Commands::Demo => {
                let command = DemoCommand::new(&config)?;
                command.execute()
            }
            Commands::Shell { sim } => {
                let command = ShellCommand::new(&config)?;
                command.execute(sim)
            }
            Commands::Config { json } => {
                let command = ConfigCommand::new(&config, &home)?;
                command.execute(json)
            }
        }
    })();

    if let Err(e) = result {
        eprintln!(
            "{}",
            format_error_with_color(&e, std::io::stderr().is_terminal())
        );
        std::process::exit(get_exit_code(&e));
    }
}
