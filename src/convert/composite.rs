//! The composite converter: schema-driven traversal of document nodes.
//!
//! One converter serves a whole engine; it is stateless apart from the
//! collaborators it borrows. Each read clones the schema's label maps,
//! consumes them while walking the input node, and instantiates the result
//! through constructor selection. Each write follows the structure tree so
//! output order is the declared order, not member order.

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::any::{Any, TypeId};

use super::session::Session;
use super::trace;
use crate::construct::Criteria;
use crate::error::{DocumentError, Error, SchemaError};
use crate::label::{Label, ListOps, MapOps, Shape, Variant};
use crate::node::{Element, InputNode, OutputNode};
use crate::schema::{Registry, Replaced, Schema, Section};
use crate::strategy::Strategy;
use crate::structure::{ModelId, Slot};
use crate::style::Style;
use crate::tag::DEFAULT_REVISION;
use crate::transform::Transforms;
use crate::util::{HashMap, HashSet, new_map, new_set};

// -----------------------------------------------------------------------------
// Composite

/// Converts between erased values and document elements, one schema at a
/// time.
pub struct Composite<'a> {
    registry: &'a Registry,
    transforms: &'a Transforms,
    style: &'a dyn Style,
    strategy: &'a dyn Strategy,
}

impl<'a> Composite<'a> {
    /// Creates a converter over the engine's collaborators.
    pub fn new(
        registry: &'a Registry,
        transforms: &'a Transforms,
        style: &'a dyn Style,
        strategy: &'a dyn Strategy,
    ) -> Self {
        Self {
            registry,
            transforms,
            style,
            strategy,
        }
    }

    fn schema_for(&self, ty: TypeId, type_name: &'static str) -> Result<Arc<Schema>, Error> {
        self.registry.schema(ty, type_name, self.style)
    }

    // -- Reading --------------------------------------------------------------

    /// Reads `element` as a value of the declared type.
    ///
    /// The strategy gets the first look and may substitute the type to
    /// instantiate; the declared type is kept otherwise.
    pub fn read(
        &self,
        declared: TypeId,
        type_name: &'static str,
        element: &Element,
        session: &mut Session,
    ) -> Result<Box<dyn Any>, Error> {
        let ty = self
            .strategy
            .resolve(declared, element, self.registry, session)?
            .unwrap_or(declared);
        let schema = self.schema_for(ty, type_name)?;

        session.enter();
        let result = self.read_with(&schema, element, session, false);
        session.leave();
        if result.is_err() && session.depth() == 0 {
            trace::clear();
        }
        result
    }

    /// Checks that `element` matches the declared type's schema without
    /// instantiating anything. Values are still parsed, nested composites
    /// still traversed.
    pub fn validate(
        &self,
        declared: TypeId,
        type_name: &'static str,
        element: &Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        let ty = self
            .strategy
            .resolve(declared, element, self.registry, session)?
            .unwrap_or(declared);
        let schema = self.schema_for(ty, type_name)?;

        session.enter();
        let result = self.read_with(&schema, element, session, true).map(|_| ());
        session.leave();
        if result.is_err() && session.depth() == 0 {
            trace::clear();
        }
        result
    }

    fn read_with(
        &self,
        schema: &Schema,
        element: &Element,
        session: &mut Session,
        dry: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let mut criteria = Criteria::new(schema.type_name());
        let mut sections: Vec<Section> = schema.sections.clone();

        // The version attribute decides leniency for the whole pass: a
        // document of another revision is read on a best-effort basis.
        let mut lenient = false;
        if let Some(version) = schema.version() {
            match element.attribute(version.name()) {
                Some(text) => {
                    let value = self
                        .transforms
                        .read_as(TypeId::of::<f64>(), version.type_name(), text)?;
                    let revision = value
                        .downcast_ref::<f64>()
                        .copied()
                        .unwrap_or(schema.revision());
                    if revision != schema.revision() {
                        lenient = true;
                    }
                    criteria.set(Arc::clone(version), value);
                }
                None => {
                    if version.is_required() {
                        lenient = true;
                    }
                }
            }
        }
        let strict = schema.is_strict() && !lenient;

        self.consume(
            schema,
            schema.structure().root(),
            element,
            &mut sections,
            &mut criteria,
            strict,
            session,
            dry,
            true,
        )?;

        // Text label.
        if let Some(text) = schema.text() {
            trace::push(text.name());
            match element.value().or_else(|| text.empty_value()) {
                Some(value) => {
                    let parsed = self.transforms.read_as(text.ty(), text.type_name(), value)?;
                    criteria.set(Arc::clone(text), parsed);
                }
                None => {
                    // Required data stays required in non-strict mode;
                    // strictness only governs unknown nodes.
                    if text.is_required() && !lenient {
                        return Err(DocumentError::MissingText {
                            owner: Cow::Borrowed(schema.type_name()),
                            line: element.line(),
                        }
                        .into());
                    }
                }
            }
            trace::pop();
        }

        // Declared empty defaults satisfy whatever the document left out.
        for section in &sections {
            for label in section.attributes.iter().chain(section.elements.iter()) {
                if criteria.contains(label.criteria_key()) {
                    continue;
                }
                if let Some(empty) = label.empty_value() {
                    let parsed = self.transforms.read_as(label.ty(), label.type_name(), empty)?;
                    criteria.set(Arc::clone(label), parsed);
                }
            }
        }

        // Whatever is still unmatched and required is missing data.
        if !lenient {
            for section in &sections {
                for label in section.attributes.iter() {
                    if label.is_required() && !criteria.contains(label.criteria_key()) {
                        return Err(DocumentError::MissingAttribute {
                            name: String::from(label.name()),
                            line: element.line(),
                        }
                        .into());
                    }
                }
                for label in section.elements.iter() {
                    if label.is_required() && !criteria.contains(label.criteria_key()) {
                        return Err(DocumentError::MissingElement {
                            name: String::from(label.name()),
                            line: element.line(),
                        }
                        .into());
                    }
                }
            }
        }

        if dry {
            return Ok(Box::new(()));
        }

        let mut instance = schema.construct(&mut criteria)?;
        criteria.commit(instance.as_mut())?;

        schema
            .hooks()
            .validate(instance.as_ref())
            .map_err(|reason| DocumentError::Invalid {
                reason: trace::annotate(reason),
            })?;
        schema
            .hooks()
            .commit(instance.as_mut())
            .map_err(|reason| DocumentError::Invalid {
                reason: trace::annotate(reason),
            })?;

        let resolved = schema
            .hooks()
            .resolve(instance)
            .map_err(|reason| DocumentError::Invalid {
                reason: trace::annotate(reason),
            })?;
        if (*resolved).type_id() != schema.ty() {
            return Err(DocumentError::TypeMismatch {
                expected: Cow::Borrowed(schema.type_name()),
                found: Cow::Borrowed("<resolved substitute>"),
                line: element.line(),
            }
            .into());
        }
        Ok(resolved)
    }

    /// Consumes the attributes and children of `node` against model `at`.
    fn consume(
        &self,
        schema: &Schema,
        at: ModelId,
        node: &Element,
        sections: &mut Vec<Section>,
        criteria: &mut Criteria,
        strict: bool,
        session: &mut Session,
        dry: bool,
        root: bool,
    ) -> Result<(), Error> {
        // Attributes.
        for attribute in node.attributes() {
            let name = attribute.name.as_str();
            if root {
                if let Some(version) = schema.version()
                    && version.name() == name
                {
                    continue;
                }
                if self.strategy.is_marker(name) {
                    continue;
                }
            }
            match sections[at].attributes.take(name) {
                Some(label) => {
                    trace::push(label.name());
                    let value =
                        self.transforms
                            .read_as(label.ty(), label.type_name(), &attribute.value)?;
                    criteria.set(label, value);
                    trace::pop();
                }
                None => {
                    if strict && !schema.section(at).attributes.contains(name) {
                        return Err(DocumentError::UnexpectedAttribute {
                            name: String::from(name),
                            line: node.line(),
                        }
                        .into());
                    }
                }
            }
        }

        // Children, in document order.
        let mut occurrences: HashMap<String, usize> = new_map();
        let mut input = InputNode::new(node);
        while let Some(child) = input.next() {
            let name = child.name();

            if let Some(label) = sections[at].elements.get(name).cloned() {
                if label.is_collection() {
                    // Stays matchable for the whole pass: every further
                    // occurrence folds into the collection the criteria holds.
                    self.accumulate(&label, name, child.element(), criteria, strict, session, dry)?;
                } else {
                    sections[at].elements.take(name);
                    trace::push(name);
                    let value = self.read_scalar(
                        &label,
                        label.variant_named(name),
                        child.element(),
                        session,
                        dry,
                    )?;
                    criteria.set(label, value);
                    trace::pop();
                }
                continue;
            }

            // Consumed already: a repeat of a single-valued element.
            if schema.section(at).elements.contains(name) {
                if strict {
                    return Err(DocumentError::DuplicateElement {
                        name: String::from(name),
                        line: child.line(),
                    }
                    .into());
                }
                continue;
            }

            // An intermediate structure element holding nested labels.
            if schema.structure().is_child(at, name) {
                let seen = occurrences.entry(String::from(name)).or_insert(0);
                *seen += 1;
                match schema.structure().child(at, name, *seen) {
                    Some(inner) => {
                        trace::push(name);
                        self.consume(
                            schema,
                            inner,
                            child.element(),
                            sections,
                            criteria,
                            strict,
                            session,
                            dry,
                            false,
                        )?;
                        trace::pop();
                    }
                    None => {
                        if strict {
                            return Err(DocumentError::UnexpectedElement {
                                name: String::from(name),
                                line: child.line(),
                            }
                            .into());
                        }
                    }
                }
                continue;
            }

            if strict {
                return Err(DocumentError::UnexpectedElement {
                    name: String::from(name),
                    line: child.line(),
                }
                .into());
            }
        }
        Ok(())
    }

    /// Whether occurrences of the label match entry-by-entry in the owner.
    fn matches_inline(label: &Label) -> bool {
        label.is_inline() || label.is_union()
    }

    /// Folds one matched occurrence of a collection label into the
    /// accumulating value held by the criteria.
    fn accumulate(
        &self,
        label: &Arc<Label>,
        matched: &str,
        node: &Element,
        criteria: &mut Criteria,
        strict: bool,
        session: &mut Session,
        dry: bool,
    ) -> Result<(), Error> {
        trace::push(label.name());
        match label.shape() {
            Shape::List(ops) => {
                let mut collection = match criteria.remove(label.criteria_key()) {
                    Some(variable) => variable.value,
                    None => ops.new_value(),
                };
                if Self::matches_inline(label) {
                    // The matched element is itself one entry.
                    self.push_list_entry(
                        label,
                        ops,
                        matched,
                        node,
                        collection.as_mut(),
                        session,
                        dry,
                    )?;
                } else {
                    // The matched element wraps the entries.
                    let mut input = InputNode::new(node);
                    while let Some(entry) = input.next() {
                        if entry.name() != label.entry() {
                            if strict {
                                return Err(DocumentError::UnexpectedElement {
                                    name: String::from(entry.name()),
                                    line: entry.line(),
                                }
                                .into());
                            }
                            continue;
                        }
                        self.push_list_entry(
                            label,
                            ops,
                            entry.name(),
                            entry.element(),
                            collection.as_mut(),
                            session,
                            dry,
                        )?;
                    }
                }
                criteria.set(Arc::clone(label), collection);
            }
            Shape::Map(ops) => {
                let mut collection = match criteria.remove(label.criteria_key()) {
                    Some(variable) => variable.value,
                    None => ops.new_value(),
                };
                if Self::matches_inline(label) {
                    self.put_map_entry(label, ops, node, collection.as_mut(), session, dry)?;
                } else {
                    let mut input = InputNode::new(node);
                    while let Some(entry) = input.next() {
                        if entry.name() != label.entry() {
                            if strict {
                                return Err(DocumentError::UnexpectedElement {
                                    name: String::from(entry.name()),
                                    line: entry.line(),
                                }
                                .into());
                            }
                            continue;
                        }
                        self.put_map_entry(
                            label,
                            ops,
                            entry.element(),
                            collection.as_mut(),
                            session,
                            dry,
                        )?;
                    }
                }
                criteria.set(Arc::clone(label), collection);
            }
            Shape::Scalar => unreachable!("collection label with scalar shape"),
        }
        trace::pop();
        Ok(())
    }

    fn push_list_entry(
        &self,
        label: &Label,
        ops: &ListOps,
        name: &str,
        node: &Element,
        collection: &mut dyn Any,
        session: &mut Session,
        dry: bool,
    ) -> Result<(), Error> {
        let variant = label.variant_named(name);
        let ty = variant.map_or(ops.entry_ty(), Variant::ty);
        let type_name = variant.map_or(ops.entry_type_name(), Variant::type_name);

        let value = self.read_content(label, ty, type_name, node, session, dry)?;
        if dry {
            return Ok(());
        }
        let entry = match variant {
            Some(variant) => variant.wrap(value).ok_or(DocumentError::TypeMismatch {
                expected: Cow::Borrowed(ops.entry_type_name()),
                found: Cow::Borrowed(type_name),
                line: node.line(),
            })?,
            None => value,
        };
        if !ops.push(collection, entry) {
            return Err(DocumentError::TypeMismatch {
                expected: Cow::Borrowed(ops.entry_type_name()),
                found: Cow::Borrowed(type_name),
                line: node.line(),
            }
            .into());
        }
        Ok(())
    }

    fn put_map_entry(
        &self,
        label: &Label,
        ops: &MapOps,
        node: &Element,
        collection: &mut dyn Any,
        session: &mut Session,
        dry: bool,
    ) -> Result<(), Error> {
        let Some(key_text) = node.attribute(label.key()) else {
            return Err(DocumentError::MissingAttribute {
                name: String::from(label.key()),
                line: node.line(),
            }
            .into());
        };
        let key = self
            .transforms
            .read_as(ops.key_ty(), ops.key_type_name(), key_text)?;
        let value =
            self.read_content(label, ops.value_ty(), ops.value_type_name(), node, session, dry)?;
        if dry {
            return Ok(());
        }
        if !ops.put(collection, key, value) {
            return Err(DocumentError::TypeMismatch {
                expected: Cow::Borrowed(ops.value_type_name()),
                found: Cow::Borrowed(ops.key_type_name()),
                line: node.line(),
            }
            .into());
        }
        Ok(())
    }

    /// Reads one scalar label occurrence, rebuilding the member value for
    /// unions.
    fn read_scalar(
        &self,
        label: &Label,
        variant: Option<&Variant>,
        node: &Element,
        session: &mut Session,
        dry: bool,
    ) -> Result<Box<dyn Any>, Error> {
        let ty = variant.map_or(label.ty(), Variant::ty);
        let type_name = variant.map_or(label.type_name(), Variant::type_name);

        let value = self.read_content(label, ty, type_name, node, session, dry)?;
        if dry {
            return Ok(value);
        }
        match variant {
            Some(variant) => match variant.wrap(value) {
                Some(member) => Ok(member),
                None => Err(DocumentError::TypeMismatch {
                    expected: Cow::Borrowed(label.type_name()),
                    found: Cow::Borrowed(type_name),
                    line: node.line(),
                }
                .into()),
            },
            None => Ok(value),
        }
    }

    /// Reads a node's content as a value of `ty`: primitive text when the
    /// transform registry claims the type, composite traversal when a
    /// schema exists, a schema error otherwise.
    fn read_content(
        &self,
        label: &Label,
        ty: TypeId,
        type_name: &'static str,
        node: &Element,
        session: &mut Session,
        dry: bool,
    ) -> Result<Box<dyn Any>, Error> {
        if self.transforms.is_primitive(ty) {
            let text = node.value().or_else(|| label.empty_value()).unwrap_or("");
            return Ok(self.transforms.read_as(ty, type_name, text)?);
        }
        if self.registry.contains(ty) {
            if dry {
                self.validate(ty, type_name, node, session)?;
                return Ok(Box::new(()));
            }
            return self.read(ty, type_name, node, session);
        }
        Err(SchemaError::CannotRepresent {
            label: Cow::Owned(String::from(label.name())),
            ty: Cow::Borrowed(type_name),
        }
        .into())
    }

    // -- Writing --------------------------------------------------------------

    /// Writes `value`, declared as `declared`, into `element`.
    ///
    /// Returns `false` when the value's replace hook suppressed the output;
    /// the caller decides whether absence is acceptable.
    pub fn write(
        &self,
        declared: TypeId,
        type_name: &'static str,
        value: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<bool, Error> {
        if self.transforms.is_primitive(value.type_id()) {
            element.set_value(self.transforms.write_value(value, type_name)?);
            return Ok(true);
        }

        let schema = self.schema_for(value.type_id(), type_name)?;
        match schema.hooks().replace(value) {
            Replaced::Keep => {
                self.write_body(&schema, declared, value, element, session)?;
                Ok(true)
            }
            Replaced::Substitute(substitute) => {
                // The substitute is written as-is; its own replace hook does
                // not run again.
                let schema = self.schema_for((*substitute).type_id(), type_name)?;
                self.write_body(&schema, declared, substitute.as_ref(), element, session)?;
                Ok(true)
            }
            Replaced::Skip => Ok(false),
        }
    }

    fn write_body(
        &self,
        schema: &Schema,
        declared: TypeId,
        value: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        if self
            .strategy
            .mark(schema.ty(), declared, element, self.registry, session)?
        {
            return Ok(());
        }

        session.enter();
        let result = self.write_parts(schema, value, element, session);
        session.leave();

        // The cleanup hook runs regardless of how the write went.
        let completed = schema
            .hooks()
            .complete(value)
            .map_err(|reason| DocumentError::Invalid {
                reason: trace::annotate(reason),
            });
        let result = result.and(completed.map_err(Into::into));
        if result.is_err() && session.depth() == 0 {
            trace::clear();
        }
        result
    }

    fn write_parts(
        &self,
        schema: &Schema,
        value: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        schema
            .hooks()
            .persist(value)
            .map_err(|reason| DocumentError::Invalid {
                reason: trace::annotate(reason),
            })?;

        // Version attribute, only when the revision is informative.
        if let Some(version) = schema.version()
            && (schema.revision() != DEFAULT_REVISION || version.is_required())
        {
            let revision = match version.contact().get(value) {
                Some(current) => self.transforms.write_value(current, version.type_name())?,
                None => self
                    .transforms
                    .write_value(&schema.revision(), version.type_name())?,
            };
            element.set_attribute(String::from(version.name()), revision);
        }

        self.emit(schema, schema.structure().root(), value, element, session)?;

        // Text label.
        if let Some(text) = schema.text() {
            trace::push(text.name());
            match text.contact().get(value) {
                Some(current) => {
                    element.set_value(self.transforms.write_value(current, text.type_name())?);
                    if text.is_data() {
                        element.set_data(true);
                    }
                }
                None => {
                    if text.is_required() {
                        return Err(DocumentError::MissingValue {
                            name: String::from(text.name()),
                            owner: Cow::Borrowed(schema.type_name()),
                        }
                        .into());
                    }
                }
            }
            trace::pop();
        }
        Ok(())
    }

    /// Writes the attributes and element slots of model `at` in declared
    /// order, descending into nested models.
    fn emit(
        &self,
        schema: &Schema,
        at: ModelId,
        value: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        let section = schema.section(at);
        let model = schema.structure().model(at);

        for name in model.attribute_names() {
            let Some(label) = section.attributes().get(name) else {
                continue;
            };
            trace::push(label.name());
            match label.contact().get(value) {
                Some(current) => {
                    let text = self.transforms.write_value(current, label.type_name())?;
                    element.set_attribute(String::from(label.name()), text);
                }
                None => {
                    if label.is_required() {
                        return Err(DocumentError::MissingValue {
                            name: String::from(label.name()),
                            owner: Cow::Borrowed(schema.type_name()),
                        }
                        .into());
                    }
                }
            }
            trace::pop();
        }

        // A union occupies one slot per alternative name; write it once.
        let mut written: HashSet<&'static str> = new_set();
        for slot in model.slots() {
            match slot {
                Slot::Model(inner) => {
                    let name = schema.structure().model(*inner).name();
                    trace::push(name);
                    let mut output = OutputNode::new(element);
                    let mut child = output.child(String::from(name));
                    self.emit(schema, *inner, value, child.element(), session)?;
                    child.commit();
                    trace::pop();
                }
                Slot::Element { name, .. } => {
                    let Some(label) = section.elements().get(name) else {
                        continue;
                    };
                    if !written.insert(label.criteria_key()) {
                        continue;
                    }
                    self.write_label(schema, label, value, element, session)?;
                }
            }
        }
        Ok(())
    }

    fn write_label(
        &self,
        schema: &Schema,
        label: &Arc<Label>,
        owner: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        trace::push(label.name());
        let result = self.write_label_inner(schema, label, owner, element, session);
        trace::pop();
        result
    }

    fn write_label_inner(
        &self,
        schema: &Schema,
        label: &Arc<Label>,
        owner: &dyn Any,
        element: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        let missing = || {
            Error::from(DocumentError::MissingValue {
                name: String::from(label.name()),
                owner: Cow::Borrowed(schema.type_name()),
            })
        };

        let Some(member) = label.contact().get(owner) else {
            if label.is_required() {
                return Err(missing());
            }
            return Ok(());
        };

        match label.shape() {
            Shape::Scalar => {
                let (name, value, ty, type_name) = match label.variant_of(member) {
                    Some((variant, value)) => {
                        (variant.name(), value, variant.ty(), variant.type_name())
                    }
                    None if label.is_union() => {
                        return Err(DocumentError::UnknownAlternative {
                            label: String::from(label.name()),
                            ty: Cow::Borrowed(label.type_name()),
                        }
                        .into());
                    }
                    None => (label.name(), member, label.ty(), label.type_name()),
                };
                match self.render_value(label, name, ty, type_name, value, session)? {
                    Some(child) => element.add_child(child),
                    None => {
                        if label.is_required() {
                            return Err(missing());
                        }
                    }
                }
            }
            Shape::List(ops) => {
                let entries = ops.visit(member).ok_or_else(missing)?;
                if Self::matches_inline(label) {
                    self.write_list_entries(label, ops, &entries, element, session)?;
                } else {
                    let mut wrapper = Element::new(String::from(label.name()));
                    self.write_list_entries(label, ops, &entries, &mut wrapper, session)?;
                    element.add_child(wrapper);
                }
            }
            Shape::Map(ops) => {
                let entries = ops.visit(member).ok_or_else(missing)?;
                if label.is_inline() {
                    self.write_map_entries(label, ops, &entries, element, session)?;
                } else {
                    let mut wrapper = Element::new(String::from(label.name()));
                    self.write_map_entries(label, ops, &entries, &mut wrapper, session)?;
                    element.add_child(wrapper);
                }
            }
        }
        Ok(())
    }

    fn write_list_entries(
        &self,
        label: &Label,
        ops: &ListOps,
        entries: &[&dyn Any],
        parent: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        for &entry in entries {
            let (name, value, ty, type_name) = match label.variant_of(entry) {
                Some((variant, value)) => {
                    (variant.name(), value, variant.ty(), variant.type_name())
                }
                None if label.is_union() => {
                    return Err(DocumentError::UnknownAlternative {
                        label: String::from(label.name()),
                        ty: Cow::Borrowed(ops.entry_type_name()),
                    }
                    .into());
                }
                None => (label.entry(), entry, ops.entry_ty(), ops.entry_type_name()),
            };
            if let Some(child) = self.render_value(label, name, ty, type_name, value, session)? {
                parent.add_child(child);
            }
        }
        Ok(())
    }

    fn write_map_entries(
        &self,
        label: &Label,
        ops: &MapOps,
        entries: &[(&dyn Any, &dyn Any)],
        parent: &mut Element,
        session: &mut Session,
    ) -> Result<(), Error> {
        for &(key, value) in entries {
            let key_text = self.transforms.write_value(key, ops.key_type_name())?;
            if let Some(mut child) = self.render_value(
                label,
                label.entry(),
                ops.value_ty(),
                ops.value_type_name(),
                value,
                session,
            )? {
                child.set_attribute(String::from(label.key()), key_text);
                parent.add_child(child);
            }
        }
        Ok(())
    }

    /// Renders one value as a named element, detached so the caller decides
    /// placement. `None` when the value's replace hook suppressed it.
    fn render_value(
        &self,
        label: &Label,
        name: &str,
        ty: TypeId,
        type_name: &'static str,
        value: &dyn Any,
        session: &mut Session,
    ) -> Result<Option<Element>, Error> {
        let mut child = Element::new(String::from(name));
        if self.transforms.is_primitive(ty) {
            child.set_value(self.transforms.write_value(value, type_name)?);
            if label.is_data() {
                child.set_data(true);
            }
            return Ok(Some(child));
        }
        if !self.registry.contains(ty) {
            return Err(SchemaError::CannotRepresent {
                label: Cow::Owned(String::from(label.name())),
                ty: Cow::Borrowed(type_name),
            }
            .into());
        }
        match self.write(ty, type_name, value, &mut child, session)? {
            true => Ok(Some(child)),
            false => Ok(None),
        }
    }
}
