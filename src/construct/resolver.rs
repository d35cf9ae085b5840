//! Pure scoring and selection over constructor candidates.

use super::{Criteria, Initializer, Parameter};
use crate::label::Label;

// Separates candidates that match the same share of their parameters:
// the wider one wins. Small enough to never outweigh a ratio difference
// for realistic parameter counts.
const WIDTH_BONUS: f64 = 1e-4;

/// Whether a constructor parameter can consume the value of a label:
/// the types are identical and the parameter name matches the member name
/// or one of the label's document names.
pub(crate) fn param_matches(param: &Parameter, variable_label: &Label) -> bool {
    if param.ty() != variable_label.ty() {
        return false;
    }
    param.name() == variable_label.criteria_key()
        || variable_label.document_names().any(|n| n == param.name())
}

fn find_param<'a>(params: &'a [Parameter], label: &Label) -> Option<&'a Parameter> {
    params.iter().find(|p| param_matches(p, label))
}

/// Scores one candidate against the currently available values.
///
/// Returns a negative score when the candidate is disqualified: a required
/// parameter has no value, or a read-only label could not be injected
/// through this candidate. Otherwise the score is the fraction of
/// parameters matched, plus a small bonus in the parameter count so the
/// most specific fully-matching candidate wins ties.
pub fn score_initializer(
    initializer: &Initializer,
    criteria: &Criteria,
    read_only: &[&Label],
) -> f64 {
    let params = initializer.params();

    // Read-only members can only be set through construction.
    for label in read_only {
        if find_param(params, label).is_none() {
            return -1.0;
        }
    }

    let mut matched = 0usize;
    for param in params {
        let found = criteria
            .iter()
            .any(|variable| param_matches(param, &variable.label));
        if found {
            matched += 1;
        } else if param.is_required() {
            return -1.0;
        }
    }

    let total = params.len();
    let ratio = if total == 0 {
        0.0
    } else {
        matched as f64 / total as f64
    };
    ratio + total as f64 * WIDTH_BONUS
}

/// Selects the best-scoring candidate, if any scores non-negative.
///
/// The result carries the score so callers can log or compare; equal scores
/// keep the earliest declared candidate.
pub fn select_initializer<'a>(
    initializers: &'a [Initializer],
    criteria: &Criteria,
    read_only: &[&Label],
) -> Option<(&'a Initializer, f64)> {
    let mut best: Option<(&'a Initializer, f64)> = None;
    for initializer in initializers {
        let score = score_initializer(initializer, criteria, read_only);
        if score < 0.0 {
            continue;
        }
        match best {
            Some((_, top)) if top >= score => {}
            _ => best = Some((initializer, score)),
        }
    }
    best
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::construct::Parameter;
    use crate::contact::Contact;
    use crate::label::Shape;
    use crate::style::Identity;
    use crate::tag::{TagKind, implicit};
    use alloc::boxed::Box;
    use alloc::sync::Arc;
    use alloc::vec::Vec;

    struct Wide {
        a: u32,
        b: u32,
        c: u32,
    }

    fn label(name: &'static str) -> Arc<Label> {
        let contact = match name {
            "a" => Contact::field::<Wide, u32>("a", |s| &s.a, |s, v| s.a = v),
            "b" => Contact::field::<Wide, u32>("b", |s| &s.b, |s, v| s.b = v),
            _ => Contact::field::<Wide, u32>("c", |s| &s.c, |s, v| s.c = v),
        };
        Arc::new(
            Label::build(
                contact,
                implicit(TagKind::Element),
                Shape::Scalar,
                Vec::new(),
                &Identity,
            )
            .unwrap(),
        )
    }

    fn candidates() -> Vec<Initializer> {
        alloc::vec![
            Initializer::new::<Wide>([Parameter::new::<u32>("a")], |c| {
                Ok(Wide {
                    a: c.take("a")?,
                    b: 0,
                    c: 0,
                })
            }),
            Initializer::new::<Wide>(
                [Parameter::new::<u32>("a"), Parameter::new::<u32>("b")],
                |c| {
                    Ok(Wide {
                        a: c.take("a")?,
                        b: c.take("b")?,
                        c: 0,
                    })
                }
            ),
            Initializer::new::<Wide>(
                [
                    Parameter::new::<u32>("a"),
                    Parameter::new::<u32>("b"),
                    Parameter::new::<u32>("c"),
                ],
                |c| {
                    Ok(Wide {
                        a: c.take("a")?,
                        b: c.take("b")?,
                        c: c.take("c")?,
                    })
                }
            ),
        ]
    }

    fn criteria_with(names: &[&'static str]) -> Criteria {
        let mut criteria = Criteria::new("tests::Wide");
        for &name in names {
            criteria.set(label(name), Box::new(1u32));
        }
        criteria
    }

    #[test]
    fn widest_fully_matched_candidate_wins() {
        let candidates = candidates();
        let criteria = criteria_with(&["a", "b", "c"]);

        let (chosen, score) = select_initializer(&candidates, &criteria, &[]).unwrap();
        assert_eq!(chosen.params().len(), 3);
        assert!(score > 1.0);
    }

    #[test]
    fn partial_criteria_selects_the_satisfiable_candidate() {
        let candidates = candidates();
        let criteria = criteria_with(&["a", "b"]);

        let (chosen, _) = select_initializer(&candidates, &criteria, &[]).unwrap();
        assert_eq!(chosen.params().len(), 2);
    }

    #[test]
    fn missing_required_parameter_disqualifies() {
        let candidates = candidates();
        let criteria = criteria_with(&[]);
        assert!(select_initializer(&candidates, &criteria, &[]).is_none());
    }

    #[test]
    fn read_only_label_requires_an_injecting_candidate() {
        let read_only = Arc::new(
            Label::build(
                Contact::read_only::<Wide, u32>("c", |s| &s.c),
                implicit(TagKind::Element),
                Shape::Scalar,
                Vec::new(),
                &Identity,
            )
            .unwrap(),
        );
        let candidates = candidates();
        let criteria = criteria_with(&["a", "b", "c"]);

        // Only the three-parameter candidate injects `c`.
        let (chosen, _) =
            select_initializer(&candidates, &criteria, &[read_only.as_ref()]).unwrap();
        assert_eq!(chosen.params().len(), 3);

        // A candidate set without it is disqualified entirely.
        let narrow = &candidates[..2];
        assert!(select_initializer(narrow, &criteria, &[read_only.as_ref()]).is_none());
    }

    #[test]
    fn optional_parameter_does_not_disqualify() {
        let init = Initializer::new::<Wide>(
            [
                Parameter::new::<u32>("a"),
                Parameter::new::<u32>("b").optional(),
            ],
            |c| {
                Ok(Wide {
                    a: c.take("a")?,
                    b: c.take_opt("b")?.unwrap_or_default(),
                    c: 0,
                })
            },
        );
        let criteria = criteria_with(&["a"]);
        let score = score_initializer(&init, &criteria, &[]);
        assert!(score >= 0.5);

        let mut criteria = criteria_with(&["a"]);
        let value = init.construct(&mut criteria).unwrap();
        let wide = value.downcast_ref::<Wide>().unwrap();
        assert_eq!((wide.a, wide.b), (1, 0));
    }
}
