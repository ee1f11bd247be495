//! Coupled-field problem management: fields, couplings and the blocks that
//! aggregate hard-coupled fields into single solvable units.

pub mod bc;
pub mod block;
pub mod coupling;
pub mod enums;
pub mod field;
pub mod field_info;
pub mod plugin;
mod policy;
pub mod solver;
pub mod weak_form;

use std::rc::Rc;

use coupling::CouplingInfo;
use field_info::FieldInfo;

pub use block::{Block, BlockState};

/// Splits a field set into blocks: fields linked by a hard coupling,
/// transitively, end up in the same block and are solved as one monolithic
/// system.
///
/// Each block receives the hard couplings that justified its grouping plus
/// every weak coupling whose target is one of its members. Caller-supplied
/// field order is preserved within each block (it fixes solution-vector
/// offsets), and blocks come out in the order of their first member.
pub fn decompose_into_blocks(
    field_infos: &[Rc<FieldInfo>],
    couplings: &[Rc<CouplingInfo>],
) -> Vec<Block> {
    let index_of = |field_id: &str| -> Option<usize> {
        field_infos
            .iter()
            .position(|info| info.field_id() == field_id)
    };

    // Union-find over field indices, driven by hard couplings.
    let mut parent: Vec<usize> = (0..field_infos.len()).collect();

    fn root(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for coupling in couplings {
        if !coupling.is_hard() {
            continue;
        }
        let (Some(a), Some(b)) = (
            index_of(coupling.source_field().field_id()),
            index_of(coupling.target_field().field_id()),
        ) else {
            // Hard coupling into a field outside this problem definition;
            // nothing to group here.
            continue;
        };
        let (ra, rb) = (root(&mut parent, a), root(&mut parent, b));
        if ra != rb {
            // Attach the later root under the earlier one so group order
            // follows the caller-supplied field order.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            parent[hi] = lo;
        }
    }

    // Collect members per root, preserving field order.
    let mut group_order: Vec<usize> = vec![];
    let mut members: Vec<Vec<Rc<FieldInfo>>> = vec![];
    for i in 0..field_infos.len() {
        let r = root(&mut parent, i);
        match group_order.iter().position(|&known| known == r) {
            Some(g) => members[g].push(field_infos[i].clone()),
            None => {
                group_order.push(r);
                members.push(vec![field_infos[i].clone()]);
            }
        }
    }

    members
        .into_iter()
        .map(|group| {
            let in_group = |field_id: &str| group.iter().any(|info| info.field_id() == field_id);
            let relevant: Vec<Rc<CouplingInfo>> = couplings
                .iter()
                .filter(|coupling| {
                    (coupling.is_hard()
                        && in_group(coupling.source_field().field_id())
                        && in_group(coupling.target_field().field_id()))
                        || (coupling.is_weak() && in_group(coupling.target_field().field_id()))
                })
                .cloned()
                .collect();
            Block::new(group, relevant)
        })
        .collect()
}
