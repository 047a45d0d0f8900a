// # gandi-ddns
//
// Points one record of a Gandi zone at the address of a local interface.
//
// ```bash
// gandi-ddns --api_file /etc/ifddns/gandi.key --iface eth0 --family ip6 \
//     --zone 1234567 --record home
// ```
//
// The live zone version is copied, every record with the same name and type
// is removed from the copy, the new record is added, and the copy is made
// live. Pass `--use_ote` to work against the Gandi test environment.

use anyhow::Context;
use clap::Parser;
use ifddns::{IfddnsExitCode, build_runtime, flag_error_exit, init_tracing, require_flag};
use ifddns_core::{AddressFamily, ZoneEngine, ZoneTarget, read_api_key};
use ifddns_ip_iface::SystemAddressSource;
use ifddns_provider_gandi::{Environment, GandiZoneApi};
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "gandi-ddns", version, about = "Gandi zone record updater for a local interface address")]
struct Cli {
    /// Path to the file containing the Gandi API key to use
    #[arg(long = "api_file", value_name = "PATH")]
    api_file: Option<String>,

    /// Whether to use the Gandi Testing Environment
    #[arg(long = "use_ote")]
    use_ote: bool,

    /// Name of the local interface to get the address from
    #[arg(long = "iface", value_name = "NAME")]
    iface: Option<String>,

    /// Address family for the IP to set
    #[arg(long = "family", default_value = "ip4")]
    family: String,

    /// ID of the Gandi zone to use
    #[arg(long = "zone", value_name = "ID")]
    zone: Option<i64>,

    /// Name of the record to use (local part of the hostname)
    #[arg(long = "record", value_name = "NAME")]
    record: Option<String>,
}

/// Everything needed to run, after the flags checked out
struct Setup {
    api_key: String,
    environment: Environment,
    target: ZoneTarget,
}

fn setup(cli: Cli) -> anyhow::Result<Setup> {
    let api_file = require_flag("api_file", cli.api_file)?;
    let interface = require_flag("iface", cli.iface)?;

    let family: AddressFamily = cli
        .family
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid value for --family: {}", e))?;

    let zone_id = match cli.zone {
        Some(id) if id != 0 => id,
        _ => anyhow::bail!("Missing value for --zone"),
    };
    let record = require_flag("record", cli.record)?;

    let api_key = read_api_key(&api_file).context("Unable to load API key")?;

    Ok(Setup {
        api_key,
        environment: Environment::from_use_ote(cli.use_ote),
        target: ZoneTarget {
            zone_id,
            record,
            interface,
            family,
        },
    })
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

    info!("gandi-ddns {} - Gandi zone record updater", env!("CARGO_PKG_VERSION"));

    let Setup {
        api_key,
        environment,
        target,
    } = match setup(cli) {
        Ok(setup) => setup,
        Err(e) => {
            error!("{:#}", e);
            return IfddnsExitCode::ConfigError.into();
        }
    };

    let api = match GandiZoneApi::new(api_key, environment) {
        Ok(api) => api,
        Err(e) => {
            error!("{}", e);
            return IfddnsExitCode::ConfigError.into();
        }
    };
    info!("Using Gandi endpoint {}", api.endpoint());

    let rt = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return IfddnsExitCode::RuntimeError.into();
        }
    };

    let engine = ZoneEngine::new(Box::new(SystemAddressSource::new()), Box::new(api));

    let result = rt.block_on(async {
        match engine.run(&target).await {
            Ok(outcome) => {
                info!(
                    "Record \"{}\" now points at {} (zone {} version {})",
                    outcome.record.name, outcome.address, target.zone_id, outcome.version
                );
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
