//! Resolving parameter values from a JSON document.
//!
//! Selectors address nested data: `user.id` reads field `id` of object
//! `user`, and `items[0].sku` reads field `sku` of the first element of the
//! array `items`.

use alloc::vec::Vec;

use serde_json::Value;

use crate::errors::Error;
use crate::parsed::Parameters;
use crate::selector::{Segment, Selector};

impl Selector {
    /// Walk `root` along the selector's segments.
    ///
    /// Returns `None` as soon as a field is missing, an index is out of
    /// bounds, or a segment is applied to a value of the wrong shape.
    #[must_use]
    pub fn resolve<'v>(&self, root: &'v Value) -> Option<&'v Value> {
        self.segments().try_fold(root, |value, segment| match segment {
            Segment::Field(field) => value.as_object()?.get(field),
            Segment::Index(_) => value.as_array()?.get(segment.position()?),
        })
    }
}

impl Parameters {
    /// Look up the value of every parameter in `root`, in binding order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingValue`] naming the first parameter that does
    /// not resolve.
    pub fn values_from_json<'v>(&self, root: &'v Value) -> Result<Vec<&'v Value>, Error> {
        self.iter()
            .map(|p| {
                p.name
                    .resolve(root)
                    .ok_or_else(|| Error::MissingValue(p.name.as_str().into()))
            })
            .collect()
    }
}
