use ecow::{EcoString, eco_format};

use crate::diag::StrResult;
use crate::foundations::{ColumnWidth, Keep, Keyword, PropertyId, Space, Value};
use crate::layout::{Abs, Length, Sides};
use crate::model::{ContentTree, NodeId};

/// The properties in effect for one node: its own, plus inherited ones
/// looked up along the ancestor chain.
///
/// Absent properties read as their initial value. A value of the wrong
/// kind fails with an error that the caller can attach a span to.
#[derive(Copy, Clone)]
pub struct Styles<'a> {
    tree: &'a ContentTree,
    node: NodeId,
}

impl<'a> Styles<'a> {
    pub(super) fn new(tree: &'a ContentTree, node: NodeId) -> Self {
        Self { tree, node }
    }

    /// The node whose properties these are.
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// The raw value of a property, walking up the tree for inherited
    /// properties.
    pub fn get(&self, id: PropertyId) -> Option<&'a Value> {
        let mut current = Some(self.node);
        while let Some(node) = current {
            let node = self.tree.node(node);
            if let Some(value) = node.properties().get(id) {
                return Some(value);
            }
            if !id.is_inherited() {
                return None;
            }
            current = node.parent();
        }
        None
    }

    /// A length property, zero when absent.
    pub fn length(&self, id: PropertyId) -> StrResult<Length> {
        Ok(self.auto_length(id)?.unwrap_or_default())
    }

    /// A length property that may be `auto`, `None` when absent or `auto`.
    pub fn auto_length(&self, id: PropertyId) -> StrResult<Option<Length>> {
        match self.get(id) {
            None => Ok(None),
            Some(Value::Length(length)) => Ok(Some(length.clone())),
            Some(Value::Keyword(keyword)) if keyword == "auto" => Ok(None),
            Some(other) => Err(mismatch(id, "length", other)),
        }
    }

    /// A keyword property, its initial value when absent.
    pub fn keyword<T: Keyword>(&self, id: PropertyId) -> StrResult<T> {
        match self.get(id) {
            None => Ok(T::default()),
            Some(Value::Keyword(keyword)) => T::parse(keyword),
            Some(other) => Err(mismatch(id, "keyword", other)),
        }
    }

    /// A keep property, `auto` in every context when absent.
    pub fn keep(&self, id: PropertyId) -> StrResult<Keep> {
        match self.get(id) {
            None => Ok(Keep::default()),
            Some(Value::Keep(keep)) => Ok(*keep),
            Some(Value::Keyword(keyword)) if keyword == "auto" => Ok(Keep::default()),
            Some(other) => Err(mismatch(id, "keep", other)),
        }
    }

    /// An integer property.
    pub fn int(&self, id: PropertyId, default: i64) -> StrResult<i64> {
        match self.get(id) {
            None => Ok(default),
            Some(Value::Int(int)) => Ok(*int),
            Some(other) => Err(mismatch(id, "integer", other)),
        }
    }

    /// A space property. A plain length counts as a fixed space.
    pub fn space(&self, id: PropertyId) -> StrResult<Space> {
        match self.get(id) {
            None => Ok(Space::default()),
            Some(Value::Space(space)) => Ok(space.clone()),
            Some(Value::Length(length)) => Ok(Space::fixed(length.clone())),
            Some(other) => Err(mismatch(id, "space", other)),
        }
    }

    /// A color property.
    pub fn color(&self, id: PropertyId) -> StrResult<Option<EcoString>> {
        match self.get(id) {
            None => Ok(None),
            Some(Value::Color(color)) => Ok(Some(color.clone())),
            Some(Value::Keyword(keyword)) if keyword == "transparent" => Ok(None),
            Some(other) => Err(mismatch(id, "color", other)),
        }
    }

    /// The declared width of a table column, `1*` when absent.
    pub fn column_width(&self) -> StrResult<ColumnWidth> {
        match self.get(PropertyId::ColumnWidth) {
            None => Ok(ColumnWidth::default()),
            Some(Value::ColumnWidth(width)) => Ok(width.clone()),
            Some(Value::Length(length)) => Ok(ColumnWidth::Fixed(length.clone())),
            Some(other) => Err(mismatch(PropertyId::ColumnWidth, "column width", other)),
        }
    }

    /// The font size in effect, `default` if no node on the ancestor chain
    /// sets one.
    pub fn font_size(&self, default: Abs) -> Length {
        match self.get(PropertyId::FontSize) {
            Some(Value::Length(length)) => length.clone(),
            _ => Length::Fixed(default),
        }
    }

    /// The border widths on the four edges.
    pub fn border_widths(&self) -> StrResult<Sides<Length>> {
        Ok(Sides::new(
            self.length(PropertyId::BorderStartWidth)?,
            self.length(PropertyId::BorderBeforeWidth)?,
            self.length(PropertyId::BorderEndWidth)?,
            self.length(PropertyId::BorderAfterWidth)?,
        ))
    }

    /// The paddings on the four edges.
    pub fn paddings(&self) -> StrResult<Sides<Length>> {
        Ok(Sides::new(
            self.length(PropertyId::PaddingStart)?,
            self.length(PropertyId::PaddingBefore)?,
            self.length(PropertyId::PaddingEnd)?,
            self.length(PropertyId::PaddingAfter)?,
        ))
    }
}

fn mismatch(id: PropertyId, expected: &str, found: &Value) -> EcoString {
    eco_format!("expected {expected} for {}, found {found:?}", id.name())
}
