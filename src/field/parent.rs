//! container resolution for show/hide styling

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::dom::ElementRef;

type Resolver = dyn Fn(&ElementRef) -> Option<ElementRef>;

/// maps a field element to the container that receives the hidden class
/// (e.g. a wrapping `.form-group`)
#[derive(Clone)]
pub struct ParentSelector {
    resolve: Rc<Resolver>,
    /// set when built from a `closest()` selector
    selector: Option<String>,
}

impl ParentSelector {
    pub fn new(resolve: impl Fn(&ElementRef) -> Option<ElementRef> + 'static) -> Self {
        Self {
            resolve: Rc::new(resolve),
            selector: None,
        }
    }

    /// nearest inclusive ancestor matching `selector`
    pub fn closest(selector: impl Into<String>) -> Self {
        let selector = selector.into();
        let query = selector.clone();
        Self {
            resolve: Rc::new(move |element: &ElementRef| element.closest(&query)),
            selector: Some(selector),
        }
    }

    pub fn resolve(&self, element: &ElementRef) -> Option<ElementRef> {
        (self.resolve)(element)
    }

    pub fn selector(&self) -> Option<&str> {
        self.selector.as_deref()
    }
}

impl fmt::Debug for ParentSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.selector {
            Some(s) => write!(f, "ParentSelector(closest {:?})", s),
            None => write!(f, "ParentSelector(<fn>)"),
        }
    }
}

impl Serialize for ParentSelector {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.selector {
            Some(s) => serializer.serialize_str(s),
            None => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for ParentSelector {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ParentSelector::closest(String::deserialize(deserializer)?))
    }
}
