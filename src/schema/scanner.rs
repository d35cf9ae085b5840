//! Compiles a description into its schema.
//!
//! The scan is the single place a description's declarations are checked
//! against each other: resolved names must be unique per position, at most
//! one text and one version label may exist, text excludes elements, every
//! order entry must be backed by a label, and getter-only members must be
//! reachable through a constructor. A failing scan poisons the type in the
//! registry, so all checks run eagerly here.

use alloc::borrow::Cow;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use super::description::{Description, Member};
use super::schema::{Schema, Section};
use crate::construct::param_matches;
use crate::error::SchemaError;
use crate::label::Label;
use crate::structure::{Expression, ModelId, Segment, Structure};
use crate::style::Style;
use crate::tag::{DEFAULT_REVISION, TagKind};

// -----------------------------------------------------------------------------
// Scan

/// Compiles `description` into a [`Schema`], applying `style` to every
/// external name.
pub(crate) fn scan(description: Description, style: &dyn Style) -> Result<Schema, SchemaError> {
    let owner = description.type_name;
    let members = shadow(description.members);

    let mut structure = Structure::new();
    let mut sections: Vec<Section> = Vec::new();

    // Order declarations go in first so their slots fix the write order.
    if let Some(order) = &description.order {
        for entry in order.element_entries() {
            let expression = Expression::parse(entry)?;
            let (prefix, target) = expression.split_target();
            let at = structure.resolve(&styled(prefix, style));
            structure.expect_element(at, &style.element(&target.name));
        }
        for entry in order.attribute_entries() {
            let expression = Expression::parse(entry)?;
            let (prefix, target) = expression.split_target();
            let at = structure.resolve(&styled(prefix, style));
            structure.expect_attribute(at, &style.attribute(&target.name));
        }
    }

    let mut text: Option<Arc<Label>> = None;
    let mut version: Option<Arc<Label>> = None;
    let mut read_only: Vec<Arc<Label>> = Vec::new();
    let mut has_elements = false;

    for member in members {
        let kind = member.tag.kind();
        let label = Arc::new(Label::build(
            member.contact,
            member.tag,
            member.shape,
            member.variants,
            style,
        )?);

        if !label.contact().is_writable() {
            read_only.push(Arc::clone(&label));
        }

        match kind {
            TagKind::Text => {
                if text.is_some() {
                    return Err(SchemaError::MultipleText {
                        owner: Cow::Borrowed(owner),
                    });
                }
                text = Some(label);
                continue;
            }
            TagKind::Version => {
                if version.is_some() {
                    return Err(SchemaError::MultipleVersion {
                        owner: Cow::Borrowed(owner),
                    });
                }
                version = Some(label);
                continue;
            }
            TagKind::Element | TagKind::ElementList | TagKind::ElementMap => {
                has_elements = true;
            }
            TagKind::Attribute => {}
        }

        let at = match label.expression() {
            Some(expression) => structure.resolve(expression.segments()),
            None => structure.root(),
        };
        let section = section_mut(&mut sections, at);

        if label.is_attribute() {
            structure.register_attribute(at, label.name());
            section.attributes.insert(label)?;
        } else {
            for name in label.document_names() {
                structure.register_element(at, name);
            }
            section.elements.insert(label)?;
        }
    }

    if text.is_some() && has_elements {
        return Err(SchemaError::TextConflict {
            owner: Cow::Borrowed(owner),
        });
    }

    // A value for a getter-only member can only arrive through construction.
    for label in &read_only {
        let injectable = description
            .initializers
            .iter()
            .flat_map(|i| i.params())
            .any(|p| param_matches(p, label));
        if !injectable {
            return Err(SchemaError::ReadOnlyWithoutParameter {
                name: Cow::Borrowed(label.criteria_key()),
                owner: Cow::Borrowed(owner),
            });
        }
    }

    structure.validate(owner)?;
    sections.resize_with(structure.len(), Section::default);

    let revision = version
        .as_ref()
        .map_or(DEFAULT_REVISION, |v| v.tag().version_revision());

    Ok(Schema {
        ty: description.ty,
        type_name: owner,
        name: style.element(description.name),
        revision,
        strict: description.strict,
        structure,
        sections,
        text,
        version,
        read_only,
        initializers: description.initializers,
        default_init: description.default_init,
        hooks: description.hooks,
    })
}

/// Resolves member shadowing: a later declaration of the same member name
/// replaces the earlier one in place, so derived descriptions keep the base
/// declaration order while overriding individual members.
fn shadow(members: Vec<Member>) -> Vec<Member> {
    let mut resolved: Vec<Member> = Vec::with_capacity(members.len());
    for member in members {
        let name = member.contact.name();
        match resolved.iter_mut().find(|m| m.contact.name() == name) {
            Some(slot) if member.generation >= slot.generation => *slot = member,
            Some(_) => {}
            None => resolved.push(member),
        }
    }
    resolved
}

fn styled(segments: &[Segment], style: &dyn Style) -> Vec<Segment> {
    segments
        .iter()
        .map(|s| Segment {
            name: style.element(&s.name),
            index: s.index,
        })
        .collect()
}

fn section_mut(sections: &mut Vec<Section>, at: ModelId) -> &mut Section {
    if sections.len() <= at {
        sections.resize_with(at + 1, Section::default);
    }
    &mut sections[at]
}

// -----------------------------------------------------------------------------
// Tests
