//! Allocate command handler.

use owo_colors::OwoColorize;
use tabled::Tabled;

use vlsm_config::{self as config, Config, Plan};
use vlsm_core::{AllocatedSubnet, AllocationResult, Block, SubnetRequirement, validate_cidr};

use crate::cli::{AllocateArgs, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Settings};

use super::util;

/// Wasted addresses above this are highlighted as a poor fit.
const WASTE_WARN_THRESHOLD: u64 = 20;

/// Width of the utilization bar in the summary, in cells.
const BAR_WIDTH: u64 = 20;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct SubnetRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Needed")]
    needed: u32,
    #[tabled(rename = "Network")]
    network: String,
    #[tabled(rename = "Mask")]
    mask: String,
    #[tabled(rename = "Usable Range")]
    range: String,
    #[tabled(rename = "Broadcast")]
    broadcast: String,
    #[tabled(rename = "Usable")]
    usable: u64,
    #[tabled(rename = "Block")]
    block: u64,
    #[tabled(rename = "Wasted")]
    wasted: String,
}

impl SubnetRow {
    fn new(s: &AllocatedSubnet, color: bool) -> Self {
        let wasted = match (color, s.wasted_addresses > WASTE_WARN_THRESHOLD) {
            (false, _) => s.wasted_addresses.to_string(),
            (true, true) => s.wasted_addresses.yellow().to_string(),
            (true, false) => s.wasted_addresses.green().to_string(),
        };

        Self {
            name: s.name.clone(),
            needed: s.needed_hosts,
            network: s.cidr(),
            mask: s.subnet_mask.to_string(),
            range: format!("{} - {}", s.first_usable, s.last_usable),
            broadcast: s.broadcast_address.to_string(),
            usable: s.usable_hosts,
            block: s.block_size,
            wasted,
        }
    }
}

// ── Request resolution ──────────────────────────────────────────────

/// Merge the saved plan (explicit or default), positionals, and `--from-file`
/// into one parent and one ordered requirement list.
fn resolve_request(
    args: &AllocateArgs,
    cfg: &Config,
) -> Result<(String, Vec<SubnetRequirement>), CliError> {
    let plan_name = args.plan.as_deref().or_else(|| {
        if args.parent.is_none() {
            cfg.default_plan.as_deref()
        } else {
            None
        }
    });

    let (parent, mut requirements, extra) = match plan_name {
        Some(name) => {
            let plan = cfg.plan(name)?;
            tracing::debug!(plan = name, parent = %plan.parent, "using saved plan");

            // With a plan, the first positional is a parent override only if it
            // looks like a block; otherwise it is one more requirement.
            let mut extra: Vec<String> = Vec::new();
            let mut parent = plan.parent.clone();
            match args.parent.as_deref() {
                Some(p) if validate_cidr(p) => parent = p.to_owned(),
                Some(p) => extra.push(p.to_owned()),
                None => {}
            }
            extra.extend(args.subnets.iter().cloned());
            (parent, plan.subnets.clone(), extra)
        }
        None => (
            args.parent.clone().unwrap_or_default(),
            Vec::new(),
            args.subnets.clone(),
        ),
    };

    let parsed = util::parse_requirements(&extra, requirements.len())?;
    requirements.extend(parsed);

    if let Some(ref path) = args.from_file {
        let from_file = util::read_requirements_file(path, requirements.len())?;
        tracing::debug!(path = %path.display(), count = from_file.len(), "read requirements file");
        requirements.extend(from_file);
    }

    Ok((parent, requirements))
}

// ── Rendering ───────────────────────────────────────────────────────

fn usage_bar(allocated: u64, capacity: u64) -> String {
    let filled = if capacity == 0 {
        0
    } else {
        allocated.min(capacity) * BAR_WIDTH / capacity
    };
    (0..BAR_WIDTH)
        .map(|i| if i < filled { '█' } else { '░' })
        .collect()
}

fn summary(result: &AllocationResult, capacity: u64) -> String {
    [
        format!("Total needed:     {} hosts", result.total_needed),
        format!(
            "Total allocated:  {} of {capacity} addresses",
            result.total_allocated
        ),
        format!(
            "Utilization:      {} {:.2}% of capacity",
            usage_bar(result.total_allocated, capacity),
            result.utilization_pct.min(100.0)
        ),
    ]
    .join("\n")
}

fn table_with_summary(result: &AllocationResult, capacity: u64, color: bool) -> String {
    let mut parts = Vec::new();
    if !result.subnets.is_empty() {
        let rows: Vec<SubnetRow> = result
            .subnets
            .iter()
            .map(|s| SubnetRow::new(s, color))
            .collect();
        parts.push(output::render_table(&rows));
    }
    parts.push(summary(result, capacity));
    if let Some(ref err) = result.error {
        parts.push(format!("Error:            {err}"));
    }
    parts.join("\n\n")
}

fn plain_cidrs(result: &AllocationResult) -> String {
    result
        .subnets
        .iter()
        .map(AllocatedSubnet::cidr)
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_report(
    result: &AllocationResult,
    capacity: u64,
    settings: &Settings,
) -> Result<String, CliError> {
    output::render_single(
        settings.format,
        result,
        |r| table_with_summary(r, capacity, settings.color),
        plain_cidrs,
    )
}

fn render_subnets(
    result: &AllocationResult,
    capacity: u64,
    settings: &Settings,
) -> Result<String, CliError> {
    match settings.format {
        OutputFormat::Table => Ok(table_with_summary(result, capacity, settings.color)),
        format => output::render_list(
            format,
            &result.subnets,
            |s| SubnetRow::new(s, false),
            AllocatedSubnet::cidr,
        ),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: AllocateArgs, cfg: &Config, settings: &Settings) -> Result<(), CliError> {
    let (parent, requirements) = resolve_request(&args, cfg)?;
    util::check_request(&parent, &requirements)?;

    let capacity = parent.parse::<Block>()?.capacity();

    let result = match vlsm_core::allocate(&parent, &requirements) {
        Ok(result) => result,
        Err(err) => {
            if args.report {
                let out = render_report(&AllocationResult::failed(&err), capacity, settings)?;
                output::print_output(&out, settings.quiet);
            }
            return Err(err.into());
        }
    };

    let out = if args.report {
        render_report(&result, capacity, settings)?
    } else {
        render_subnets(&result, capacity, settings)?
    };
    output::print_output(&out, settings.quiet);

    if let Some(ref path) = args.export {
        output::write_json_file(path, &result.subnets)?;
        if !settings.quiet {
            eprintln!("✓ Exported {} subnets to {}", result.subnets.len(), path.display());
        }
    }

    if let Some(name) = args.save {
        let plan = Plan {
            parent,
            subnets: requirements,
        };
        plan.validate()?;

        let mut cfg = config::load_config_for_update()?;
        cfg.plans.insert(name.clone(), plan);
        config::save_config(&cfg)?;
        if !settings.quiet {
            eprintln!("✓ Saved plan '{name}'");
        }
    }

    Ok(())
}
