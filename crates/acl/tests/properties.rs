use std::collections::HashSet;

use acl::{AclKind, AclModel, AclPerms, AclTarget, MaskState, Principal};
use proptest::prelude::*;

const NAMES: [&str; 4] = ["alice", "bob", "1001", "nfsnobody"];

fn perms(bits: u8) -> AclPerms {
    AclPerms::from_bits(bits)
}

/// Builds ACL text from raw choices, skipping lines that would duplicate an
/// entry already emitted in the same collection.
fn build_text(lines: &[(u8, u8, u8, bool)]) -> String {
    let mut seen = HashSet::new();
    let mut text = String::new();
    for &(selector, bits, name, default) in lines {
        let name = NAMES[usize::from(name) % NAMES.len()];
        let prefix = if default { "default:" } else { "" };
        let p = perms(bits);
        let (key, line) = match selector % 8 {
            0 => ("user::".to_owned(), format!("{prefix}user::{p}")),
            1 => ("group::".to_owned(), format!("{prefix}group::{p}")),
            2 => ("other::".to_owned(), format!("{prefix}other::{p}")),
            3 => ("mask::".to_owned(), format!("{prefix}mask::{p}")),
            4 => (format!("user:{name}"), format!("{prefix}user:{name}:{p}")),
            5 => (format!("group:{name}"), format!("{prefix}group:{name}:{p}")),
            6 => {
                text.push_str(&format!("# note {name}\n"));
                continue;
            }
            _ => {
                text.push('\n');
                continue;
            }
        };
        if seen.insert((default, key)) {
            text.push_str(&line);
            text.push('\n');
        }
    }
    text
}

fn decoded(text: &str) -> AclModel {
    AclModel::decode(AclTarget::directory("/gpfs/prop"), text).expect("generated text decodes")
}

proptest! {
    #[test]
    fn decode_encode_round_trips(
        lines in proptest::collection::vec((any::<u8>(), 0u8..16, 0u8..4, any::<bool>()), 0..=24)
    ) {
        let model = decoded(&build_text(&lines));
        let encoded = model.encode();
        let again = AclModel::decode(AclTarget::directory("/gpfs/prop"), &encoded)
            .expect("encoded text decodes");
        prop_assert_eq!(&again, &model);
        prop_assert_eq!(again.encode(), encoded);
    }

    #[test]
    fn unpinned_mask_is_union_of_group_and_named(
        ops in proptest::collection::vec((0u8..4, 0u8..4, 0u8..16), 0..=16)
    ) {
        let mut model = decoded("user::rwxc\ngroup::r-x-\nother::----\n");
        for (op, name, bits) in ops {
            let name = NAMES[usize::from(name)];
            match op {
                0 => model.add_named_user(AclKind::Access, name, perms(bits)).expect("add user"),
                1 => model.add_named_group(AclKind::Access, name, perms(bits)).expect("add group"),
                2 => {
                    let _ = model.remove_named_user(AclKind::Access, name);
                }
                _ => model.set_group_perm(AclKind::Access, perms(bits)).expect("set group"),
            }
        }

        let access = model.access();
        prop_assert_eq!(access.mask_state(), MaskState::Derived);
        let expected = access
            .named()
            .iter()
            .fold(access.owning_group().unwrap_or(AclPerms::NONE), |mask, entry| {
                mask.union(entry.perms())
            });
        prop_assert_eq!(access.mask(), Some(expected));
        for entry in access.named() {
            let effective = model.effective_perms(AclKind::Access, entry.principal());
            prop_assert!(expected.covers(effective));
        }
    }

    #[test]
    fn edited_models_reach_a_fixed_point(
        lines in proptest::collection::vec((any::<u8>(), 0u8..16, 0u8..4, any::<bool>()), 0..=16),
        pin in proptest::option::of(0u8..16),
        name in 0u8..4,
        bits in 0u8..16,
    ) {
        let mut model = decoded(&build_text(&lines));
        let name = NAMES[usize::from(name)];
        model.add_named_group(AclKind::Access, name, perms(bits)).expect("add group");
        if let Some(pin) = pin {
            model.pin_mask(AclKind::Access, perms(pin)).expect("pin mask");
        }

        let first = decoded(&model.encode());
        let second = decoded(&first.encode());
        prop_assert_eq!(&second, &first);
        prop_assert_eq!(
            first.named_group_perms(AclKind::Access, name),
            perms(bits)
        );
        prop_assert_eq!(
            first.effective_perms(AclKind::Access, &Principal::group(name)),
            model.effective_perms(AclKind::Access, &Principal::group(name))
        );
    }
}
