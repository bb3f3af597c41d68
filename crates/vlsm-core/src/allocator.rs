// ── VLSM allocator ──
//
// Largest-first packing of power-of-two blocks from the parent's network
// address upward. Blocks are placed back to back with no padding; since
// sizes are non-increasing and start from an aligned network address,
// every block lands on a multiple of its own size anyway.

use tracing::{debug, trace};

use crate::block::Block;
use crate::error::CoreError;
use crate::model::{AllocatedSubnet, AllocationResult, SubnetRequirement};
use crate::sizing;

/// Carve `requirements` out of `parent`.
///
/// `parent` should already have passed [`validate_cidr`](crate::validate_cidr);
/// host bits in it are cleared before packing. Requirements with zero hosts
/// are dropped. Equal host counts keep their input order.
///
/// Failure is all-or-nothing: the first requirement that does not fit
/// aborts the batch with [`CoreError::CapacityExceeded`].
pub fn allocate(
    parent: &str,
    requirements: &[SubnetRequirement],
) -> Result<AllocationResult, CoreError> {
    let block: Block = parent.parse()?;
    let broadcast = u64::from(block.broadcast());

    let mut ordered: Vec<&SubnetRequirement> =
        requirements.iter().filter(|r| r.host_count > 0).collect();
    // `sort_by` is stable, which keeps ties in input order.
    ordered.sort_by(|a, b| b.host_count.cmp(&a.host_count));

    debug!(
        parent = %block,
        requested = requirements.len(),
        allocating = ordered.len(),
        "starting allocation"
    );

    let mut subnets = Vec::with_capacity(ordered.len());
    let mut cursor = u64::from(block.network());

    for requirement in ordered {
        let prefix = sizing::minimal_prefix(requirement.host_count)
            .ok_or_else(|| capacity_exceeded(parent, requirement))?;
        let end = cursor + sizing::block_size(prefix) - 1;

        if end > broadcast {
            debug!(
                name = %requirement.name,
                hosts = requirement.host_count,
                prefix,
                "out of address space"
            );
            return Err(capacity_exceeded(parent, requirement));
        }

        let network =
            u32::try_from(cursor).map_err(|_| capacity_exceeded(parent, requirement))?;
        let subnet = AllocatedSubnet::place(requirement, network, prefix);
        trace!(name = %subnet.name, cidr = %subnet.cidr(), "placed subnet");

        subnets.push(subnet);
        cursor = end + 1;
    }

    let total_needed: u64 = subnets.iter().map(|s| u64::from(s.needed_hosts)).sum();
    let total_allocated: u64 = subnets.iter().map(|s| s.block_size).sum();
    let utilization_pct = utilization(total_allocated, block.capacity());

    debug!(
        subnets = subnets.len(),
        total_allocated, utilization_pct, "allocation complete"
    );

    Ok(AllocationResult {
        subnets,
        total_needed,
        total_allocated,
        utilization_pct,
        error: None,
    })
}

/// Like [`allocate`], but folds any failure into [`AllocationResult::error`].
pub fn calculate(parent: &str, requirements: &[SubnetRequirement]) -> AllocationResult {
    allocate(parent, requirements).unwrap_or_else(|err| AllocationResult::failed(&err))
}

fn capacity_exceeded(parent: &str, requirement: &SubnetRequirement) -> CoreError {
    CoreError::CapacityExceeded {
        parent: parent.to_owned(),
        name: requirement.name.clone(),
        hosts: requirement.host_count,
    }
}

// Both operands are at most 2^32, which f64 represents exactly.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
fn utilization(allocated: u64, capacity: u64) -> f64 {
    if capacity == 0 {
        return 0.0;
    }
    allocated as f64 / capacity as f64 * 100.0
}
