//! Tagged result records read from the MessagePack stream and their text
//! rendering.
//!
//! On the wire a record is a positional array whose first element is the
//! tag:
//!
//! | tag | shape                                                   |
//! |-----|---------------------------------------------------------|
//! | 0   | `[0, graph6, seed]`                                     |
//! | 1   | `[1, graph6, seed, c_indices, f_indices, class_index]`  |
//! | 2   | `[2, graph6, seed]`                                     |

use petgraph::graph6::ToGraph6;
use rmpv::Value;
use serde::ser::{Serialize, SerializeTuple, Serializer};
use thiserror::Error;

use crate::SimpleGraph;
use crate::graph6::{Graph6Error, edge_list, from_graph6};

pub const TAG_INDEPENDENT: u8 = 0;
pub const TAG_DEPENDENT: u8 = 1;
pub const TAG_FORBIDDEN_GRAPH: u8 = 2;

/// Placeholder for the index columns of records that carry none.
const NO_INDEX: &str = "0";

#[derive(Debug, Error)]
pub enum RecordError {
  #[error("record is not an array")]
  NotASequence,
  #[error("record has no {0} field")]
  MissingField(&'static str),
  #[error("{field} field is not {expected}")]
  FieldType {
    field: &'static str,
    expected: &'static str,
  },
  #[error("unknown record tag {0}")]
  UnknownTag(i128),
  #[error("failed to parse graph6 string '{text}' (tag {tag}): {source}")]
  Graph {
    text: String,
    tag: u8,
    source: Graph6Error,
  },
  #[error("tag {tag} record has {found} elements, expected {expected}")]
  FieldCount {
    tag: u8,
    expected: usize,
    found: usize,
  },
}

impl RecordError {
  pub fn is_unknown_tag(&self) -> bool {
    matches!(self, RecordError::UnknownTag(_))
  }

  pub fn is_field_count(&self) -> bool {
    matches!(self, RecordError::FieldCount { .. })
  }

  pub fn is_graph(&self) -> bool {
    matches!(self, RecordError::Graph { .. })
  }
}

/// graph6 text together with the graph it decodes to.
#[derive(Debug, Clone)]
pub struct EncodedGraph {
  text: String,
  graph: SimpleGraph,
}

impl EncodedGraph {
  pub fn parse(text: &str) -> Result<Self, Graph6Error> {
    let graph = from_graph6(text)?;
    Ok(Self {
      text: text.to_string(),
      graph,
    })
  }

  pub fn from_graph(graph: SimpleGraph) -> Self {
    Self {
      text: graph.graph6_string(),
      graph,
    }
  }

  pub fn as_str(&self) -> &str {
    &self.text
  }

  pub fn graph(&self) -> &SimpleGraph {
    &self.graph
  }

  pub fn vertex_count(&self) -> usize {
    self.graph.node_count()
  }
}

impl Serialize for EncodedGraph {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

#[derive(Debug, Clone)]
pub enum Record {
  /// Tag 0.
  Independent { graph: EncodedGraph, seed: i128 },
  /// Tag 1.
  Dependent {
    graph: EncodedGraph,
    seed: i128,
    c_indices: Vec<i128>,
    f_indices: Vec<i128>,
    class_index: i128,
  },
  /// Tag 2.
  ForbiddenGraph { graph: EncodedGraph, seed: i128 },
}

impl Record {
  pub fn tag(&self) -> u8 {
    match self {
      Record::Independent { .. } => TAG_INDEPENDENT,
      Record::Dependent { .. } => TAG_DEPENDENT,
      Record::ForbiddenGraph { .. } => TAG_FORBIDDEN_GRAPH,
    }
  }

  pub fn graph(&self) -> &EncodedGraph {
    match self {
      Record::Independent { graph, .. }
      | Record::Dependent { graph, .. }
      | Record::ForbiddenGraph { graph, .. } => graph,
    }
  }

  pub fn seed(&self) -> i128 {
    match self {
      Record::Independent { seed, .. }
      | Record::Dependent { seed, .. }
      | Record::ForbiddenGraph { seed, .. } => *seed,
    }
  }

  fn field_count(tag: u8) -> usize {
    if tag == TAG_DEPENDENT { 6 } else { 3 }
  }

  /// Decodes one record from a MessagePack value.
  ///
  /// Checks run in stream order: tag, graph text, seed, then the exact
  /// element count and the tag-specific fields.
  pub fn from_value(value: &Value) -> Result<Self, RecordError> {
    let fields = value.as_array().ok_or(RecordError::NotASequence)?;
    let field = |idx: usize, name: &'static str| {
      fields.get(idx).ok_or(RecordError::MissingField(name))
    };

    let tag = as_int(field(0, "tag")?, "tag")?;
    let tag = match u8::try_from(tag) {
      Ok(t @ (TAG_INDEPENDENT | TAG_DEPENDENT | TAG_FORBIDDEN_GRAPH)) => t,
      _ => return Err(RecordError::UnknownTag(tag)),
    };

    let text = field(1, "graph6")?
      .as_str()
      .ok_or(RecordError::FieldType {
        field: "graph6",
        expected: "a string",
      })?;
    let graph = EncodedGraph::parse(text).map_err(|source| RecordError::Graph {
      text: text.to_string(),
      tag,
      source,
    })?;

    let seed = as_int(field(2, "seed")?, "seed")?;

    let expected = Self::field_count(tag);
    if fields.len() != expected {
      return Err(RecordError::FieldCount {
        tag,
        expected,
        found: fields.len(),
      });
    }

    Ok(match tag {
      TAG_INDEPENDENT => Record::Independent { graph, seed },
      TAG_FORBIDDEN_GRAPH => Record::ForbiddenGraph { graph, seed },
      _ => Record::Dependent {
        graph,
        seed,
        c_indices: as_int_list(&fields[3], "c_indices")?,
        f_indices: as_int_list(&fields[4], "f_indices")?,
        class_index: as_int(&fields[5], "class_index")?,
      },
    })
  }

  /// `tag seed vertex-count c-indices f-indices class-index edges`, without
  /// the trailing newline.
  pub fn to_line(&self) -> String {
    let (c, f, class) = match self {
      Record::Dependent {
        c_indices,
        f_indices,
        class_index,
        ..
      } => (
        join_ints(c_indices),
        join_ints(f_indices),
        class_index.to_string(),
      ),
      _ => (NO_INDEX.into(), NO_INDEX.into(), NO_INDEX.into()),
    };
    let graph = self.graph();
    let edges = edge_list(graph.graph())
      .iter()
      .map(|(u, v)| format!("{u}:{v}"))
      .collect::<Vec<_>>()
      .join(",");

    [
      self.tag().to_string(),
      self.seed().to_string(),
      graph.vertex_count().to_string(),
      c,
      f,
      class,
      edges,
    ]
    .join(" ")
  }
}

/// Serializes back into the positional array layout.
impl Serialize for Record {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut tup = serializer.serialize_tuple(Self::field_count(self.tag()))?;
    tup.serialize_element(&self.tag())?;
    tup.serialize_element(self.graph())?;
    tup.serialize_element(&WireInt(self.seed()))?;
    if let Record::Dependent {
      c_indices,
      f_indices,
      class_index,
      ..
    } = self
    {
      tup.serialize_element(&WireInts(c_indices))?;
      tup.serialize_element(&WireInts(f_indices))?;
      tup.serialize_element(&WireInt(*class_index))?;
    }
    tup.end()
  }
}

/// Writes an integer with the narrowest of `i64` / `u64` that holds it.
struct WireInt(i128);

impl Serialize for WireInt {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    if let Ok(v) = i64::try_from(self.0) {
      serializer.serialize_i64(v)
    } else if let Ok(v) = u64::try_from(self.0) {
      serializer.serialize_u64(v)
    } else {
      serializer.serialize_i128(self.0)
    }
  }
}

struct WireInts<'a>(&'a [i128]);

impl Serialize for WireInts<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(self.0.iter().map(|&v| WireInt(v)))
  }
}

fn as_int(value: &Value, field: &'static str) -> Result<i128, RecordError> {
  value
    .as_i64()
    .map(i128::from)
    .or_else(|| value.as_u64().map(i128::from))
    .ok_or(RecordError::FieldType {
      field,
      expected: "an integer",
    })
}

fn as_int_list(value: &Value, field: &'static str) -> Result<Vec<i128>, RecordError> {
  value
    .as_array()
    .ok_or(RecordError::FieldType {
      field,
      expected: "an array",
    })?
    .iter()
    .map(|v| as_int(v, field))
    .collect()
}

fn join_ints(values: &[i128]) -> String {
  values
    .iter()
    .map(i128::to_string)
    .collect::<Vec<_>>()
    .join(",")
}

#[cfg(test)]
mod tests {
  use super::*;

  fn ints(values: &[i64]) -> Value {
    Value::Array(values.iter().map(|&v| Value::from(v)).collect())
  }

  fn dependent(g6: &str) -> Value {
    Value::Array(vec![
      Value::from(1),
      Value::from(g6),
      Value::from(42),
      ints(&[0, 2]),
      ints(&[1]),
      Value::from(5),
    ])
  }

  #[test]
  fn dependent_line() {
    let record = Record::from_value(&dependent("Bg")).unwrap();
    assert_eq!(record.tag(), TAG_DEPENDENT);
    assert_eq!(record.to_line(), "1 42 3 0,2 1 5 0:1,1:2");
  }

  #[test]
  fn independent_line() {
    let value = Value::Array(vec![Value::from(0), Value::from("Cl"), Value::from(99)]);
    let record = Record::from_value(&value).unwrap();
    assert_eq!(record.to_line(), "0 99 4 0 0 0 0:1,0:3,1:2,2:3");
  }

  #[test]
  fn forbidden_graph_line() {
    let value = Value::Array(vec![Value::from(2), Value::from("A_"), Value::from(1)]);
    let record = Record::from_value(&value).unwrap();
    assert!(matches!(record, Record::ForbiddenGraph { .. }));
    assert_eq!(record.to_line(), "2 1 2 0 0 0 0:1");
  }

  #[test]
  fn large_unsigned_seed_passes_through() {
    let value = Value::Array(vec![Value::from(0), Value::from("A_"), Value::from(u64::MAX)]);
    let record = Record::from_value(&value).unwrap();
    assert_eq!(record.to_line(), format!("0 {} 2 0 0 0 0:1", u64::MAX));
  }

  #[test]
  fn indices_accept_the_unsigned_range() {
    let big = Value::from(u64::MAX);
    let value = Value::Array(vec![
      Value::from(1),
      Value::from("Bg"),
      Value::from(42),
      Value::Array(vec![Value::from(-3), big.clone()]),
      Value::Array(vec![big.clone()]),
      big,
    ]);
    let record = Record::from_value(&value).unwrap();
    let max = u64::MAX;
    assert_eq!(record.to_line(), format!("1 42 3 -3,{max} {max} {max} 0:1,1:2"));

    let bytes = rmp_serde::to_vec(&record).unwrap();
    assert_eq!(rmpv::decode::read_value(&mut bytes.as_slice()).unwrap(), value);
  }

  #[test]
  fn graph_text_is_kept_verbatim() {
    let graph = EncodedGraph::parse(">>graph6<<Bg").unwrap();
    assert_eq!(graph.as_str(), ">>graph6<<Bg");
    assert_eq!(EncodedGraph::from_graph(graph.graph().clone()).as_str(), "Bg");
  }

  #[test]
  fn unknown_tag() {
    let value = Value::Array(vec![Value::from(9), Value::from("Bg"), Value::from(1)]);
    let err = Record::from_value(&value).unwrap_err();
    assert!(err.is_unknown_tag());
    assert_eq!(err.to_string(), "unknown record tag 9");

    let value = Value::Array(vec![Value::from(-1), Value::from("Bg"), Value::from(1)]);
    assert!(Record::from_value(&value).unwrap_err().is_unknown_tag());
  }

  #[test]
  fn dependent_missing_class_index() {
    let value = Value::Array(vec![
      Value::from(1),
      Value::from("Bg"),
      Value::from(42),
      ints(&[0, 2]),
    ]);
    let err = Record::from_value(&value).unwrap_err();
    assert!(err.is_field_count());
    assert!(matches!(
      err,
      RecordError::FieldCount { tag: 1, expected: 6, found: 4 }
    ));
  }

  #[test]
  fn independent_with_extra_fields() {
    let mut fields = dependent("Bg").as_array().unwrap().clone();
    fields[0] = Value::from(0);
    let err = Record::from_value(&Value::Array(fields)).unwrap_err();
    assert!(matches!(
      err,
      RecordError::FieldCount { tag: 0, expected: 3, found: 6 }
    ));
  }

  #[test]
  fn bad_graph_text_names_string_and_tag() {
    let err = Record::from_value(&dependent("B!")).unwrap_err();
    assert!(err.is_graph());
    let msg = err.to_string();
    assert!(msg.contains("'B!'"), "{msg}");
    assert!(msg.contains("tag 1"), "{msg}");
  }

  #[test]
  fn graph_is_decoded_before_the_shape_check() {
    let value = Value::Array(vec![Value::from(1), Value::from("B!"), Value::from(42)]);
    assert!(Record::from_value(&value).unwrap_err().is_graph());
  }

  #[test]
  fn wrong_field_types() {
    assert!(matches!(
      Record::from_value(&Value::from(3)),
      Err(RecordError::NotASequence)
    ));
    assert!(matches!(
      Record::from_value(&Value::Array(vec![])),
      Err(RecordError::MissingField("tag"))
    ));
    let value = Value::Array(vec![Value::from("1"), Value::from("Bg"), Value::from(1)]);
    assert!(matches!(
      Record::from_value(&value),
      Err(RecordError::FieldType { field: "tag", .. })
    ));
    let value = Value::Array(vec![Value::from(0), Value::from(7), Value::from(1)]);
    assert!(matches!(
      Record::from_value(&value),
      Err(RecordError::FieldType { field: "graph6", .. })
    ));
    let mut fields = dependent("Bg").as_array().unwrap().clone();
    fields[4] = Value::from(1);
    assert!(matches!(
      Record::from_value(&Value::Array(fields)),
      Err(RecordError::FieldType { field: "f_indices", .. })
    ));
  }

  #[test]
  fn serializes_positionally() {
    let record = Record::from_value(&dependent("Bg")).unwrap();
    let bytes = rmp_serde::to_vec(&record).unwrap();
    let value = rmpv::decode::read_value(&mut bytes.as_slice()).unwrap();
    assert_eq!(value, dependent("Bg"));
  }
}
