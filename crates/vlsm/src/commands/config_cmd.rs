//! Config subcommand handlers.

use clap::ValueEnum;
use dialoguer::Input;

use vlsm_config::{self as config, Config, DEFAULT_PARENT, Plan};
use vlsm_core::validate_cidr;

use crate::cli::{ColorMode, ConfigArgs, ConfigCommand, OutputFormat};
use crate::error::CliError;
use crate::output::{self, Settings};

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

/// Format config for display in TOML shape.
fn format_config(cfg: &Config) -> String {
    use std::fmt::Write;
    let mut out = String::new();

    if let Some(ref default) = cfg.default_plan {
        let _ = writeln!(out, "default_plan = \"{default}\"");
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "[defaults]");
    let _ = writeln!(out, "output = \"{}\"", cfg.defaults.output);
    let _ = writeln!(out, "color = \"{}\"", cfg.defaults.color);

    for (name, plan) in &cfg.plans {
        let _ = writeln!(out);
        let _ = writeln!(out, "[plans.{name}]");
        let _ = writeln!(out, "parent = \"{}\"", plan.parent);
        let _ = writeln!(out, "subnets = [");
        for s in &plan.subnets {
            let _ = writeln!(out, "  {{ name = \"{}\", hosts = {} }},", s.name, s.host_count);
        }
        let _ = writeln!(out, "]");
    }

    out.trim_end().to_owned()
}

fn save_config(cfg: &Config) -> Result<(), CliError> {
    config::save_config(cfg)?;
    Ok(())
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Check a config value against the CLI's own value names.
fn check_value<T: ValueEnum>(field: &str, value: &str) -> Result<(), CliError> {
    if T::from_str(value, true).is_ok() {
        return Ok(());
    }
    let valid: Vec<String> = T::value_variants()
        .iter()
        .filter_map(|v| v.to_possible_value().map(|p| p.get_name().to_owned()))
        .collect();
    Err(CliError::Validation {
        field: field.into(),
        reason: format!("must be one of: {}", valid.join(", ")),
    })
}

fn plan_not_found(cfg: &Config, name: String) -> CliError {
    CliError::PlanNotFound {
        name,
        available: cfg.available_plans(),
    }
}

/// Ask for subnet requirements until an empty entry.
fn prompt_subnets() -> Result<Vec<vlsm_core::SubnetRequirement>, CliError> {
    let mut subnets = Vec::new();
    loop {
        let entry: String = Input::new()
            .with_prompt(format!(
                "Subnet {} (NAME=HOSTS or HOSTS, empty to finish)",
                subnets.len() + 1
            ))
            .allow_empty(true)
            .interact_text()
            .map_err(prompt_err)?;

        if entry.trim().is_empty() {
            if subnets.is_empty() {
                eprintln!("   At least one subnet is required.");
                continue;
            }
            return Ok(subnets);
        }

        match util::parse_requirement(&entry, subnets.len()) {
            Ok(req) => subnets.push(req),
            Err(e) => eprintln!("   {e}"),
        }
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            // Fail before prompting if the existing file cannot be merged into.
            let mut cfg = config::load_config_for_update()?;
            eprintln!("✨ vlsm: configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            // 1. Plan name
            let plan_name: String = Input::new()
                .with_prompt("Plan name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            // 2. Parent block
            let parent: String = Input::new()
                .with_prompt("Parent network (CIDR)")
                .default(DEFAULT_PARENT.into())
                .validate_with(|input: &String| -> Result<(), String> {
                    if validate_cidr(input) {
                        Ok(())
                    } else {
                        Err(format!("'{input}' is not A.B.C.D/P"))
                    }
                })
                .interact_text()
                .map_err(prompt_err)?;

            // 3. Subnets
            let subnets = prompt_subnets()?;

            let plan = Plan { parent, subnets };
            plan.validate()?;

            // 4. Merge into whatever is already there
            cfg.plans.insert(plan_name.clone(), plan);
            cfg.default_plan = Some(plan_name.clone());
            save_config(&cfg)?;

            eprintln!("\n✓ Configuration written to {}", config_path.display());
            eprintln!("  Default plan: {plan_name}");
            eprintln!("\n  Try it: vlsm allocate");

            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config_or_default();
            let out = output::render_single(settings.format, &cfg, format_config, |_| {
                "config".into()
            })?;
            output::print_output(&out, settings.quiet);
            Ok(())
        }

        // ── Path ────────────────────────────────────────────────────
        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_config_for_update()?;

            match key.as_str() {
                "output" => {
                    check_value::<OutputFormat>("output", &value)?;
                    cfg.defaults.output = value.to_lowercase();
                }
                "color" => {
                    check_value::<ColorMode>("color", &value)?;
                    cfg.defaults.color = value.to_lowercase();
                }
                "default_plan" | "default-plan" => {
                    if !cfg.plans.contains_key(&value) {
                        return Err(plan_not_found(&cfg, value));
                    }
                    cfg.default_plan = Some(value);
                }
                other => {
                    return Err(CliError::Validation {
                        field: other.into(),
                        reason: format!(
                            "unknown config key '{other}'. Valid keys: output, color, default_plan"
                        ),
                    });
                }
            }

            save_config(&cfg)?;
            if !settings.quiet {
                eprintln!("✓ Set {key}");
            }
            Ok(())
        }

        // ── Plans ───────────────────────────────────────────────────
        ConfigCommand::Plans => {
            let cfg = config::load_config_or_default();
            if cfg.plans.is_empty() {
                eprintln!("No plans saved. Run: vlsm config init");
            } else {
                let default = cfg.default_plan.as_deref();
                for (name, plan) in &cfg.plans {
                    let marker = if Some(name.as_str()) == default { " *" } else { "" };
                    println!(
                        "{name}{marker}\t{}\t{} subnets",
                        plan.parent,
                        plan.subnets.len()
                    );
                }
            }
            Ok(())
        }

        // ── Use <name> ─────────────────────────────────────────────
        ConfigCommand::Use { name } => {
            let mut cfg = config::load_config_for_update()?;

            if !cfg.plans.contains_key(&name) {
                return Err(plan_not_found(&cfg, name));
            }

            cfg.default_plan = Some(name.clone());
            save_config(&cfg)?;
            if !settings.quiet {
                eprintln!("✓ Default plan set to '{name}'");
            }
            Ok(())
        }

        // ── Remove <name> ──────────────────────────────────────────
        ConfigCommand::Remove { name } => {
            let mut cfg = config::load_config_for_update()?;

            if cfg.plans.remove(&name).is_none() {
                return Err(plan_not_found(&cfg, name));
            }
            if cfg.default_plan.as_deref() == Some(name.as_str()) {
                cfg.default_plan = None;
            }

            save_config(&cfg)?;
            if !settings.quiet {
                eprintln!("✓ Removed plan '{name}'");
            }
            Ok(())
        }
    }
}
