//! Inspect command handler.

use serde::Serialize;

use vlsm_core::{Block, format_address, parse_cidr, to_binary, validate_cidr};

use crate::cli::InspectArgs;
use crate::error::CliError;
use crate::output::{self, Settings};

/// Everything worth knowing about one block, as shown by `vlsm inspect`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BlockDetails {
    input: String,
    cidr: String,
    network: String,
    prefix: u8,
    mask: String,
    wildcard: String,
    binary_mask: String,
    broadcast: String,
    capacity: u64,
    usable: u64,
    first: String,
    last: String,
    /// Whether host bits were cleared from the input.
    normalized: bool,
}

impl BlockDetails {
    fn new(input: &str, address: u32, block: &Block) -> Self {
        Self {
            input: input.to_owned(),
            normalized: address != block.network(),
            cidr: block.to_string(),
            network: format_address(block.network()),
            prefix: block.prefix(),
            mask: format_address(block.mask()),
            wildcard: format_address(block.wildcard()),
            binary_mask: to_binary(block.mask()),
            broadcast: format_address(block.broadcast()),
            capacity: block.capacity(),
            usable: block.usable_hosts(),
            first: format_address(block.first_usable()),
            last: format_address(block.last_usable()),
        }
    }
}

fn detail(d: &BlockDetails) -> String {
    let mut lines = vec![format!("Block:       {}", d.cidr)];
    if d.normalized {
        lines.push(format!("Input:       {} (host bits cleared)", d.input));
    }
    lines.extend([
        format!("Network:     {}", d.network),
        format!("Prefix:      /{}", d.prefix),
        format!("Mask:        {}", d.mask),
        format!("Wildcard:    {}", d.wildcard),
        format!("Binary mask: {}", d.binary_mask),
        format!("Broadcast:   {}", d.broadcast),
        format!("Addresses:   {}", d.capacity),
        format!("Usable:      {}", d.usable),
        format!("Host range:  {} - {}", d.first, d.last),
    ]);
    lines.join("\n")
}

pub fn handle(args: &InspectArgs, settings: &Settings) -> Result<(), CliError> {
    let input = args.cidr.trim();
    if !validate_cidr(input) {
        return Err(CliError::InvalidCidr {
            input: args.cidr.clone(),
        });
    }

    let (address, prefix) = parse_cidr(input)?;
    let details = BlockDetails::new(input, address, &Block::new(address, prefix));

    let out = output::render_single(settings.format, &details, detail, |d| d.cidr.clone())?;
    output::print_output(&out, settings.quiet);
    Ok(())
}
