use crate::Value;
use indexmap::IndexMap;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// The normalized output of a resolver.
#[derive(Clone, Debug, Default)]
pub enum FieldValue {
    #[default]
    Null,
    Scalar(Value),
    List(Vec<FieldValue>),
    Object(ObjectValue),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null | FieldValue::Scalar(Value::Null))
    }

    pub fn as_object(&self) -> Option<&ObjectValue> {
        match self {
            FieldValue::Object(object) => Some(object),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            _ => None,
        }
    }

    /// Maps JSON objects to property-map [`ObjectValue`]s (taking a string
    /// `"__typename"` property as the concrete type), arrays to lists and
    /// everything else to scalars.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Array(items) => {
                FieldValue::List(items.into_iter().map(FieldValue::from_json).collect())
            },
            serde_json::Value::Object(map) => {
                let type_name = map
                    .get("__typename")
                    .and_then(|name| name.as_str())
                    .map(str::to_string);
                let properties = map
                    .into_iter()
                    .map(|(key, value)| (key, FieldValue::from_json(value)))
                    .collect();
                let object = ObjectValue::new(properties);
                FieldValue::Object(match type_name {
                    Some(type_name) => object.with_type_name(type_name),
                    None => object,
                })
            },
            scalar => FieldValue::Scalar(Value::from(scalar)),
        }
    }
}

impl From<Value> for FieldValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            value => FieldValue::Scalar(value),
        }
    }
}

impl From<ObjectValue> for FieldValue {
    fn from(object: ObjectValue) -> Self {
        FieldValue::Object(object)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Scalar(value.into())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl<T: Into<FieldValue>> From<Vec<T>> for FieldValue {
    fn from(items: Vec<T>) -> Self {
        FieldValue::List(items.into_iter().map(Into::into).collect())
    }
}

/// A resource value exposed to the executor as an object.
///
/// Cloning is cheap: the payload is shared.
#[derive(Clone)]
pub struct ObjectValue {
    type_name: Option<Arc<str>>,
    payload: ObjectPayload,
}

#[derive(Clone)]
enum ObjectPayload {
    Properties(Arc<IndexMap<String, FieldValue>>),
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl ObjectValue {
    /// An object backed by a property map.
    pub fn new(properties: IndexMap<String, FieldValue>) -> Self {
        Self {
            type_name: None,
            payload: ObjectPayload::Properties(Arc::new(properties)),
        }
    }

    pub fn empty() -> Self {
        Self::new(IndexMap::new())
    }

    /// An object backed by an arbitrary value that resolvers can downcast.
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self {
            type_name: None,
            payload: ObjectPayload::Opaque(Arc::new(value)),
        }
    }

    pub fn with_type_name(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(Arc::from(type_name.into()));
        self
    }

    /// The concrete object type this value reports, if any.
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    pub fn properties(&self) -> Option<&IndexMap<String, FieldValue>> {
        match &self.payload {
            ObjectPayload::Properties(properties) => Some(properties),
            ObjectPayload::Opaque(_) => None,
        }
    }

    pub fn property(&self, name: &str) -> Option<&FieldValue> {
        self.properties().and_then(|properties| properties.get(name))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        match &self.payload {
            ObjectPayload::Opaque(value) => value.downcast_ref::<T>(),
            ObjectPayload::Properties(_) => None,
        }
    }

    pub fn is_opaque(&self) -> bool {
        matches!(self.payload, ObjectPayload::Opaque(_))
    }
}

impl fmt::Debug for ObjectValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ObjectValue");
        debug.field("type_name", &self.type_name);
        match &self.payload {
            ObjectPayload::Properties(properties) => debug.field("properties", properties),
            ObjectPayload::Opaque(_) => debug.field("payload", &"<opaque>"),
        };
        debug.finish()
    }
}

/// Builds a property-map [`ObjectValue`] from `name: value` pairs.
///
/// ```
/// use gqlengine::object;
///
/// let user = object! { name: "Ann", age: 31 }.with_type_name("User");
/// assert_eq!(user.type_name(), Some("User"));
/// ```
#[macro_export]
macro_rules! object {
    ($($name:ident: $value:expr,)*) => {
        {
            #[allow(unused_mut)]
            let mut properties = $crate::indexmap::IndexMap::new();
            $(
                properties.insert(
                    stringify!($name).to_string(),
                    $crate::resolver::FieldValue::from($value),
                );
            )*
            $crate::resolver::ObjectValue::new(properties)
        }
    };
    ($($name:ident: $value:expr),*) => {
        $crate::object! {$($name: $value,)*}
    };
}
