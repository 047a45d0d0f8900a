// # afraid-ddns
//
// Publishes the addresses of local interfaces to freedns.afraid.org.
//
// ```bash
// afraid-ddns --config_file /etc/ifddns/afraid.json
// ```
//
// The configuration file lists the account and the hosts to update:
//
// ```json
// {
//   "User": "alice",
//   "Password": "...",
//   "Hosts": [
//     { "Name": "home.example.org", "Interface": "eth0", "AddressFamily": "ip6" }
//   ]
// }
// ```
//
// Hosts are updated in order; the first failure stops the run.

use clap::Parser;
use ifddns::{IfddnsExitCode, build_runtime, flag_error_exit, init_tracing, require_flag};
use ifddns_core::{Config, HostEngine};
use ifddns_ip_iface::SystemAddressSource;
use ifddns_provider_afraid::AfraidProvider;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "afraid-ddns", version, about = "freedns.afraid.org interface address updater")]
struct Cli {
    /// Path to the JSON configuration file with the settings
    #[arg(long = "config_file", value_name = "PATH")]
    config_file: Option<String>,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return flag_error_exit(e),
    };

    if let Err(e) = init_tracing() {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return IfddnsExitCode::ConfigError.into();
    }

    info!("afraid-ddns {} - freedns.afraid.org updater", env!("CARGO_PKG_VERSION"));

    let config_file = match require_flag("config_file", cli.config_file) {
        Ok(path) => path,
        Err(e) => {
            error!("{}", e);
            return IfddnsExitCode::ConfigError.into();
        }
    };

    let config = match Config::load(&config_file) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("{}", e);
            return IfddnsExitCode::ConfigError.into();
        }
    };
    info!("Configuration loaded: {} host(s)", config.hosts.len());

    let provider = match AfraidProvider::from_config(&config) {
        Ok(provider) => provider,
        Err(e) => {
            error!("{}", e);
            return IfddnsExitCode::ConfigError.into();
        }
    };

    let rt = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IfddnsExitCode::RuntimeError.into();
        }
    };

    let engine = HostEngine::new(Box::new(SystemAddressSource::new()), Box::new(provider));

    let result = rt.block_on(async {
        match engine.run(&config).await {
            Ok(count) => {
                info!("{} host(s) updated", count);
                IfddnsExitCode::Success
            }
            Err(e) => {
                error!("{}", e);
                IfddnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}
