//! Line verdict resolution for both assessment paths.

use sif_types::{Pick, ValidationError, Verdict};

/// The module-path table, keyed by `(CO1, CO2, CF)`.
///
/// A line only reaches `C` with perfect alignment; a single offset degrades
/// it to `O`; `F` needs the terminal override after an early offset.
const MODULE_TABLE: [((Pick, Pick, Pick), Verdict); 8] = [
    ((Pick::C, Pick::C, Pick::C), Verdict::C),
    ((Pick::C, Pick::C, Pick::F), Verdict::O),
    ((Pick::C, Pick::O, Pick::C), Verdict::O),
    ((Pick::C, Pick::O, Pick::F), Verdict::F),
    ((Pick::O, Pick::C, Pick::C), Verdict::O),
    ((Pick::O, Pick::C, Pick::F), Verdict::F),
    ((Pick::O, Pick::O, Pick::C), Verdict::O),
    ((Pick::O, Pick::O, Pick::F), Verdict::F),
];

/// Evidence path: `C` iff both picks are clean. `F` counts as `O` here, so
/// this path never yields `F`.
#[must_use]
pub fn evidence_verdict(first: Pick, second: Pick) -> Verdict {
    if first == Pick::C && second == Pick::C {
        Verdict::C
    } else {
        Verdict::O
    }
}

/// Module path: exact table lookup. Keys outside the table are rejected.
pub fn module_verdict(co1: Pick, co2: Pick, cf: Pick) -> Result<Verdict, ValidationError> {
    let key = (co1, co2, cf);
    MODULE_TABLE
        .iter()
        .find(|(entry, _)| *entry == key)
        .map(|&(_, verdict)| verdict)
        .ok_or_else(|| ValidationError::VerdictKeyOutOfDomain {
            key: format!("{co1}{co2}{cf}"),
        })
}

#[cfg(test)]
mod tests {
    use super::{evidence_verdict, module_verdict};
    use sif_types::{Pick, ValidationError, Verdict};

    const ALL: [Pick; 3] = [Pick::C, Pick::O, Pick::F];

    #[test]
    fn evidence_is_clean_only_for_two_clean_picks() {
        for first in ALL {
            for second in ALL {
                let verdict = evidence_verdict(first, second);
                if first == Pick::C && second == Pick::C {
                    assert_eq!(verdict, Verdict::C);
                } else {
                    assert_eq!(verdict, Verdict::O, "{first}{second}");
                }
            }
        }
    }

    #[test]
    fn module_table_matches_every_documented_entry() {
        use Pick::{C, F, O};
        let expected = [
            ((C, C, C), Verdict::C),
            ((C, C, F), Verdict::O),
            ((C, O, C), Verdict::O),
            ((C, O, F), Verdict::F),
            ((O, C, C), Verdict::O),
            ((O, C, F), Verdict::F),
            ((O, O, C), Verdict::O),
            ((O, O, F), Verdict::F),
        ];
        for ((co1, co2, cf), verdict) in expected {
            assert_eq!(module_verdict(co1, co2, cf).unwrap(), verdict);
            // Determinism: the same triple always yields the same verdict.
            assert_eq!(module_verdict(co1, co2, cf).unwrap(), verdict);
        }
    }

    #[test]
    fn offset_in_terminal_slot_is_out_of_domain() {
        let err = module_verdict(Pick::C, Pick::C, Pick::O).unwrap_err();
        assert_eq!(
            err,
            ValidationError::VerdictKeyOutOfDomain {
                key: "CCO".to_owned()
            }
        );
    }

    #[test]
    fn fail_in_offset_slot_is_out_of_domain() {
        assert!(module_verdict(Pick::F, Pick::C, Pick::C).is_err());
        assert!(module_verdict(Pick::C, Pick::F, Pick::F).is_err());
    }

    #[test]
    fn exactly_eight_keys_resolve() {
        let resolved = ALL
            .iter()
            .flat_map(|&a| ALL.iter().flat_map(move |&b| ALL.iter().map(move |&c| (a, b, c))))
            .filter(|&(a, b, c)| module_verdict(a, b, c).is_ok())
            .count();
        assert_eq!(resolved, 8);
    }
}
