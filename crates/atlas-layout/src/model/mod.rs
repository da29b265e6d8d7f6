use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Display name used for records without a group key, and for keys the lookup does not know.
pub const UNCLASSIFIED: &str = "Unclassified";

/// Stable record identifier (the upstream rows use either integer or string ids).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Str(String),
}

impl RecordId {
    /// Numeric seed for the placement PRNG.
    ///
    /// String ids are folded with a fixed polynomial hash so seeds do not depend on the process
    /// (std's `DefaultHasher` is randomized per run). The modulus keeps the value small enough
    /// that `sin` retains its precision.
    pub fn seed(&self) -> f64 {
        match self {
            RecordId::Int(v) => *v as f64,
            RecordId::Str(s) => {
                let mut h: u64 = 0;
                for b in s.bytes() {
                    h = (h.wrapping_mul(31).wrapping_add(u64::from(b))) % 1_000_003;
                }
                h as f64
            }
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Int(v) => write!(f, "{v}"),
            RecordId::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RecordId {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

/// Categorical grouping key (e.g. a term category id).
///
/// Keys compare and hash by their display form: `Int(3)` and `Str("3")` are the same group,
/// matching how [`GroupNames`] resolves them. `Str("03")` stays distinct.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupKey {
    Int(i64),
    Str(String),
}

impl GroupKey {
    /// Display form used for equality, hashing and name lookup.
    pub fn canonical(&self) -> Cow<'_, str> {
        match self {
            GroupKey::Int(v) => Cow::Owned(v.to_string()),
            GroupKey::Str(s) => Cow::Borrowed(s),
        }
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (GroupKey::Int(a), GroupKey::Int(b)) => a == b,
            (GroupKey::Str(a), GroupKey::Str(b)) => a == b,
            _ => self.canonical() == other.canonical(),
        }
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.canonical().hash(state);
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Int(v) => write!(f, "{v}"),
            GroupKey::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for GroupKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for GroupKey {
    fn from(value: i32) -> Self {
        Self::Int(i64::from(value))
    }
}

impl From<&str> for GroupKey {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    /// Free-text fields; concatenated (space separated) into the record's document.
    #[serde(default)]
    pub texts: Vec<String>,
    /// Missing keys collapse into the unclassified bucket.
    #[serde(default)]
    pub group: Option<GroupKey>,
}

impl Record {
    pub fn new(
        id: impl Into<RecordId>,
        texts: impl IntoIterator<Item = impl Into<String>>,
        group: Option<GroupKey>,
    ) -> Self {
        Self {
            id: id.into(),
            texts: texts.into_iter().map(Into::into).collect(),
            group,
        }
    }

    /// The record's document: its texts joined with a space, lower-cased.
    pub fn document(&self) -> String {
        self.texts.join(" ").to_lowercase()
    }
}

/// Lookup from group key to a human-readable name.
///
/// Keys are matched by their display form, so `3` and `"3"` resolve to the same entry. This is
/// what JSON object keys look like on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupNames(FxHashMap<String, String>);

impl GroupNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl ToString, name: impl Into<String>) {
        self.0.insert(key.to_string(), name.into());
    }

    pub fn resolve(&self, key: Option<&GroupKey>) -> String {
        key.and_then(|k| self.0.get(&*k.canonical()))
            .cloned()
            .unwrap_or_else(|| UNCLASSIFIED.to_string())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: ToString, V: Into<String>> FromIterator<(K, V)> for GroupNames {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut names = Self::new();
        for (k, v) in iter {
            names.insert(k, v);
        }
        names
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePosition {
    pub id: RecordId,
    /// Index of the record in the input slice.
    pub record_index: usize,
    /// Global position, percent of the canvas on each axis.
    pub position: Point,
}

/// A similarity edge between two laid-out members of a cluster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub source: RecordId,
    pub target: RecordId,
    pub similarity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterLayout {
    pub key: Option<GroupKey>,
    pub name: String,
    /// Every record in the group, including members beyond the node cap.
    pub member_count: usize,
    pub centroid: Point,
    pub nodes: Vec<NodePosition>,
    pub links: Vec<Link>,
    pub top_terms: Vec<String>,
    /// Solver iterations actually run (0 for clusters with fewer than two nodes).
    pub iterations: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AtlasLayout {
    pub clusters: Vec<ClusterLayout>,
}

impl AtlasLayout {
    pub fn node_count(&self) -> usize {
        self.clusters.iter().map(|c| c.nodes.len()).sum()
    }

    pub fn member_count(&self) -> usize {
        self.clusters.iter().map(|c| c.member_count).sum()
    }

    pub fn position_of(&self, id: &RecordId) -> Option<Point> {
        self.clusters
            .iter()
            .flat_map(|c| c.nodes.iter())
            .find(|n| &n.id == id)
            .map(|n| n.position)
    }
}
