//! # Named Tree Values
//!
//! The generic named-tree ("NBT") format some payloads fall back to on old revisions,
//! and that item stacks carry as user data.
//!
//! This crate only builds and reads specific shapes inside such trees. The model here
//! is deliberately small: a [`Tag`] value enum, an insertion-ordered [`CompoundTag`]
//! with get/set by name, and a homogeneous [`ListTag`]. Byte encodings live in
//! [`codec`].

pub mod codec;

pub use codec::{read_root, write_root, NbtFlavor, MAX_DEPTH};

use crate::error::{constants, ProtocolError, Result};

/// Wire discriminant of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TagType {
    End = 0,
    Byte = 1,
    Short = 2,
    Int = 3,
    Long = 4,
    Float = 5,
    Double = 6,
    ByteArray = 7,
    String = 8,
    List = 9,
    Compound = 10,
    IntArray = 11,
    LongArray = 12,
}

impl TagType {
    pub fn from_u8(id: u8) -> Result<Self> {
        Ok(match id {
            0 => TagType::End,
            1 => TagType::Byte,
            2 => TagType::Short,
            3 => TagType::Int,
            4 => TagType::Long,
            5 => TagType::Float,
            6 => TagType::Double,
            7 => TagType::ByteArray,
            8 => TagType::String,
            9 => TagType::List,
            10 => TagType::Compound,
            11 => TagType::IntArray,
            12 => TagType::LongArray,
            other => {
                return Err(ProtocolError::UnknownEnumValue {
                    kind: "NBT tag type",
                    value: i64::from(other),
                })
            }
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(Vec<u8>),
    String(String),
    List(ListTag),
    Compound(CompoundTag),
    IntArray(Vec<i32>),
    LongArray(Vec<i64>),
}

impl Tag {
    pub fn tag_type(&self) -> TagType {
        match self {
            Tag::Byte(_) => TagType::Byte,
            Tag::Short(_) => TagType::Short,
            Tag::Int(_) => TagType::Int,
            Tag::Long(_) => TagType::Long,
            Tag::Float(_) => TagType::Float,
            Tag::Double(_) => TagType::Double,
            Tag::ByteArray(_) => TagType::ByteArray,
            Tag::String(_) => TagType::String,
            Tag::List(_) => TagType::List,
            Tag::Compound(_) => TagType::Compound,
            Tag::IntArray(_) => TagType::IntArray,
            Tag::LongArray(_) => TagType::LongArray,
        }
    }
}

/// Homogeneous list of tags. The element type is kept even when the list is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ListTag {
    element: TagType,
    values: Vec<Tag>,
}

impl ListTag {
    pub fn new(element: TagType) -> Self {
        Self {
            element,
            values: Vec::new(),
        }
    }

    /// Build a list, inferring the element type from the first value.
    pub fn from_values(values: Vec<Tag>) -> Result<Self> {
        let element = values.first().map_or(TagType::End, Tag::tag_type);
        if values.iter().any(|v| v.tag_type() != element) {
            return Err(ProtocolError::InvalidValue(
                constants::ERR_NBT_MIXED_LIST.to_string(),
            ));
        }
        Ok(Self { element, values })
    }

    pub fn push(&mut self, value: Tag) -> Result<()> {
        if self.values.is_empty() && self.element == TagType::End {
            self.element = value.tag_type();
        } else if value.tag_type() != self.element {
            return Err(ProtocolError::InvalidValue(
                constants::ERR_NBT_MIXED_LIST.to_string(),
            ));
        }
        self.values.push(value);
        Ok(())
    }

    pub fn element_type(&self) -> TagType {
        self.element
    }

    pub fn values(&self) -> &[Tag] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Insertion-ordered map of named tags.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompoundTag {
    entries: Vec<(String, Tag)>,
}

impl CompoundTag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tag)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn get(&self, name: &str) -> Option<&Tag> {
        self.entries.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Insert or replace a tag, keeping the original position on replace.
    pub fn set(&mut self, name: impl Into<String>, tag: Tag) -> &mut Self {
        let name = name.into();
        match self.entries.iter().position(|(k, _)| *k == name) {
            Some(index) => self.entries[index].1 = tag,
            None => self.entries.push((name, tag)),
        }
        self
    }

    /// Builder form of [`CompoundTag::set`].
    pub fn with(mut self, name: impl Into<String>, tag: Tag) -> Self {
        self.set(name, tag);
        self
    }

    pub fn remove(&mut self, name: &str) -> Option<Tag> {
        let index = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn get_compound(&self, name: &str) -> Result<Option<&CompoundTag>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::Compound(c)) => Ok(Some(c)),
            Some(other) => Err(wrong_type(name, "compound", other)),
        }
    }

    pub fn get_list(&self, name: &str) -> Result<Option<&ListTag>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::List(l)) => Ok(Some(l)),
            Some(other) => Err(wrong_type(name, "list", other)),
        }
    }

    pub fn get_byte(&self, name: &str) -> Result<Option<i8>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::Byte(v)) => Ok(Some(*v)),
            Some(other) => Err(wrong_type(name, "byte", other)),
        }
    }

    pub fn get_int(&self, name: &str) -> Result<Option<i32>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::Int(v)) => Ok(Some(*v)),
            Some(other) => Err(wrong_type(name, "int", other)),
        }
    }

    /// Float tag that must also be finite.
    pub fn get_finite_float(&self, name: &str) -> Result<Option<f32>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::Float(v)) => finite(name, *v).map(Some),
            Some(other) => Err(wrong_type(name, "float", other)),
        }
    }

    pub fn get_string(&self, name: &str) -> Result<Option<&str>> {
        match self.get(name) {
            None => Ok(None),
            Some(Tag::String(v)) => Ok(Some(v.as_str())),
            Some(other) => Err(wrong_type(name, "string", other)),
        }
    }
}

fn wrong_type(name: &str, expected: &str, found: &Tag) -> ProtocolError {
    ProtocolError::malformed(format!(
        "'{name}' should be a {expected} tag, found {:?}",
        found.tag_type()
    ))
}

/// Reject NaN and infinities, naming the offending tag.
pub fn finite(name: &str, value: f32) -> Result<f32> {
    if value.is_nan() {
        return Err(ProtocolError::malformed(format!(
            "'{name}' {}",
            constants::ERR_NON_FINITE_NAN
        )));
    }
    if value.is_infinite() {
        return Err(ProtocolError::malformed(format!(
            "'{name}' {}",
            constants::ERR_NON_FINITE_INF
        )));
    }
    Ok(value)
}

/// Finite float tag, for building trees that must only ever hold finite values.
pub fn finite_float_tag(name: &str, value: f32) -> Result<Tag> {
    finite(name, value).map(Tag::Float)
}
