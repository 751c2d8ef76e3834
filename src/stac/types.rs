//! STAC (SpatioTemporal Asset Catalog) document types.
//!
//! Every STAC object is open for extension, so each struct types the fields
//! the server reads and keeps everything else in a flattened `extra` map that
//! round-trips unmodified.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Extension fields not covered by the typed core of a STAC object.
pub type Extensions = Map<String, Value>;

/// Bounding box as `[west, south, east, north]`.
pub type BBox = [f64; 4];

/// A STAC Collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Collection {
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stac_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extent: Option<Extent>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(flatten)]
    pub extra: Extensions,
}

impl Collection {
    /// Display name: the title when present, the id otherwise.
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// First bounding box of the spatial extent, if any.
    pub fn first_bbox(&self) -> Option<&[f64]> {
        self.extent
            .as_ref()?
            .spatial
            .as_ref()?
            .bbox
            .first()
            .map(Vec::as_slice)
    }

    /// First interval of the temporal extent, if any.
    pub fn first_interval(&self) -> Option<&[Option<String>]> {
        self.extent
            .as_ref()?
            .temporal
            .as_ref()?
            .interval
            .first()
            .map(Vec::as_slice)
    }
}

/// Spatial and temporal extent of a collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spatial: Option<SpatialExtent>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporal: Option<TemporalExtent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpatialExtent {
    #[serde(default)]
    pub bbox: Vec<Vec<f64>>,
}

/// Temporal intervals; either end of an interval may be open (`null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalExtent {
    #[serde(default)]
    pub interval: Vec<Vec<Option<String>>>,
}

/// A STAC Item (GeoJSON Feature).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stac_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,

    /// GeoJSON geometry, passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geometry: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    #[serde(default)]
    pub properties: ItemProperties,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub assets: BTreeMap<String, Asset>,

    #[serde(flatten)]
    pub extra: Extensions,
}

/// Item properties. `datetime` may be null when a start/end range is used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProperties {
    #[serde(default)]
    pub datetime: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(flatten)]
    pub extra: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<String>>,

    #[serde(flatten)]
    pub extra: Extensions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub rel: String,
    pub href: String,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(flatten)]
    pub extra: Extensions,
}

/// Response of `GET /collections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionList {
    #[serde(default)]
    pub collections: Vec<Collection>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(flatten)]
    pub extra: Extensions,
}

/// Response of item searches (GeoJSON FeatureCollection).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCollection {
    #[serde(default)]
    pub features: Vec<Item>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<Link>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<SearchContext>,

    #[serde(flatten)]
    pub extra: Extensions,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub returned: Option<u64>,
}

/// Response of `GET /conformance`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Conformance {
    #[serde(rename = "conformsTo", default)]
    pub conforms_to: Vec<String>,

    #[serde(flatten)]
    pub extra: Extensions,
}

/// Body of `POST /search`. Absent fields are not serialized.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<BBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Map<String, Value>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sortby: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Query string of `GET /collections/{id}/items`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ItemsQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(
        skip_serializing_if = "Option::is_none",
        serialize_with = "serialize_bbox_param"
    )]
    pub bbox: Option<BBox>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,
}

/// Query parameters carry the bbox as `west,south,east,north`.
fn serialize_bbox_param<S>(bbox: &Option<BBox>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match bbox {
        Some(values) => serializer.serialize_str(&join_numbers(values)),
        None => serializer.serialize_none(),
    }
}

/// Join numbers with `,`, printing integral values without a fraction.
pub fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
