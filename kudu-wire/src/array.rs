use std::any::type_name;
use std::ops::{Bound, Index, RangeBounds};
use std::slice;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use snafu::ResultExt;

use crate::{AntelopeType, ByteStream, Composite, InvalidValue, JsonValue, Primitive, SerializeError};
use crate::antelopetype::MappingSnafu;
use crate::types::varint::{read_length, write_length};


/// Ordered sequence of values of the same type.
///
/// It is encoded as a [`Varuint32`](crate::Varuint32) element count followed
/// by each element in order. Arrays are immutable, slicing them returns a new
/// `Array`.
///
/// ## Example
/// ```
/// # use kudu_wire::{Array, AntelopeType, Int8, InvalidValue};
/// let arr = Array::<Int8>::from_values([-128, -127, 126, 127])?;
/// assert_eq!(arr.to_hex(), "0480817e7f");
/// assert_eq!(arr.slice(1..3).len(), 2);
/// # Ok::<(), InvalidValue>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Array<T> {
    items: Vec<T>,
}

impl<T> Array<T> {
    /// Build an array from already constructed elements.
    pub fn new(items: Vec<T>) -> Self {
        Array { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    pub fn into_vec(self) -> Vec<T> {
        self.items
    }
}

impl<T: Clone> Array<T> {
    /// Return a new array with the elements in the given range.
    ///
    /// Bounds past the end of the array are clamped, so this never panics.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        let len = self.items.len();
        let start = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        }.min(len);
        let end = match range.end_bound() {
            Bound::Included(&n) => n.saturating_add(1),
            Bound::Excluded(&n) => n,
            Bound::Unbounded => len,
        }.min(len);

        if start >= end {
            return Array::new(vec![]);
        }
        Array::new(self.items[start..end].to_vec())
    }

    /// Return a new array with the elements selected in the same way as the
    /// `[start:stop:step]` extended slicing syntax of Python.
    ///
    /// Negative indices count from the end of the array, and a negative step
    /// walks the array backwards.
    ///
    /// ## Panics
    ///
    /// Panics if `step` is 0.
    pub fn slice_step(&self, start: Option<isize>, stop: Option<isize>, step: isize) -> Self {
        assert!(step != 0, "slice step cannot be zero");
        let len = self.items.len() as isize;

        // clamp an index into [lower, upper] after resolving negative indices
        let adjust = |i: isize, lower: isize, upper: isize| {
            let i = if i < 0 { i + len } else { i };
            i.clamp(lower, upper)
        };

        let mut result = vec![];
        if step > 0 {
            let mut i = start.map_or(0, |s| adjust(s, 0, len));
            let stop = stop.map_or(len, |s| adjust(s, 0, len));
            while i < stop {
                result.push(self.items[i as usize].clone());
                match i.checked_add(step) {
                    Some(n) => i = n,
                    None => break,
                }
            }
        }
        else {
            let mut i = start.map_or(len - 1, |s| adjust(s, -1, len - 1));
            let stop = stop.map_or(-1, |s| adjust(s, -1, len - 1));
            while i > stop {
                result.push(self.items[i as usize].clone());
                match i.checked_add(step) {
                    Some(n) => i = n,
                    None => break,
                }
            }
        }
        Array::new(result)
    }
}

impl<T: Primitive> Array<T> {
    /// Build an array of primitives, validating each of the given raw values.
    pub fn from_values<I>(values: I) -> Result<Self, InvalidValue>
    where
        I: IntoIterator,
        I::Item: Into<T::Value>,
    {
        let items = values.into_iter()
            .map(|v| T::from_value(v.into()))
            .collect::<Result<Vec<T>, InvalidValue>>()?;
        Ok(Array::new(items))
    }

    /// Return the raw values of all elements.
    pub fn values(&self) -> Vec<T::Value> {
        self.items.iter().map(Primitive::value).collect()
    }
}

impl<T: Composite> Array<T> {
    /// Build an array of composites from a JSON array of objects.
    pub fn from_mappings(mappings: &JsonValue) -> Result<Self, InvalidValue> {
        let mappings = Vec::<JsonValue>::deserialize(mappings)
            .context(MappingSnafu { typename: type_name::<Self>() })?;
        let items = mappings.iter()
            .map(T::from_mapping)
            .collect::<Result<Vec<T>, InvalidValue>>()?;
        Ok(Array::new(items))
    }
}

impl<T: AntelopeType> AntelopeType for Array<T> {
    fn encode(&self, stream: &mut ByteStream) {
        write_length(stream, self.items.len());
        for item in &self.items {
            item.encode(stream);
        }
    }

    fn decode(stream: &mut ByteStream) -> Result<Self, SerializeError> {
        let len = read_length(stream)?;
        // do not trust the length prefix to preallocate memory
        let mut items = Vec::with_capacity(len.min(stream.leftover().len()));
        for _ in 0..len {
            items.push(T::decode(stream)?);
        }
        Ok(Array::new(items))
    }
}


// -----------------------------------------------------------------------------
//     Conversion traits
// -----------------------------------------------------------------------------

impl<T> Default for Array<T> {
    fn default() -> Self {
        Array::new(vec![])
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(items: Vec<T>) -> Self {
        Array::new(items)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Array::new(iter.into_iter().collect())
    }
}

impl<T> Index<usize> for Array<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IntoIterator for Array<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Serialize> Serialize for Array<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.items.serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for Array<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Array::new(Vec::<T>::deserialize(deserializer)?))
    }
}


// =============================================================================
//
//     Unittests
//
// =============================================================================

#[cfg(test)]
mod tests {
    use color_eyre::eyre::Result;
    use serde_json::json;

    use crate::{AntelopeString, Name, Uint8, Varuint32};
    use super::*;

    fn digits() -> Array<Uint8> {
        Array::from_values(0..10).unwrap()
    }

    fn raw(arr: Array<Uint8>) -> Vec<u8> {
        arr.iter().map(Uint8::get).collect()
    }

    #[test]
    fn encoding() -> Result<()> {
        let arr = Array::<Varuint32>::from_values([0, 256, 65536, 16])?;
        assert_eq!(arr.to_hex(), "0400800280800410");
        assert_eq!(Array::<Varuint32>::from_hex("0400800280800410")?, arr);

        let empty = Array::<Name>::from_values(Vec::<String>::new())?;
        assert!(empty.is_empty());
        assert_eq!(empty.to_hex(), "00");
        Ok(())
    }

    #[test]
    fn invalid_element() {
        assert!(Array::<Uint8>::from_values([1, 2, 256]).is_err());
        assert!(Array::<Name>::from_values(["abc", "ABC"]).is_err());
    }

    #[test]
    fn decoding_truncated_input() {
        // announces 3 elements, only 2 are present
        assert!(Array::<Uint8>::from_hex("030102").is_err());
        // huge announced length with no data
        assert!(Array::<Uint8>::from_hex("ffffffff0f").is_err());
    }

    #[test]
    fn slicing() {
        let arr = digits();
        assert_eq!(raw(arr.slice(2..5)), vec![2, 3, 4]);
        assert_eq!(raw(arr.slice(..3)), vec![0, 1, 2]);
        assert_eq!(raw(arr.slice(8..)), vec![8, 9]);
        assert_eq!(raw(arr.slice(5..=6)), vec![5, 6]);
        assert!(arr.slice(7..3).is_empty());
        assert!(arr.slice(20..30).is_empty());
    }

    #[test]
    fn slicing_with_step() {
        let arr = digits();
        assert_eq!(raw(arr.slice_step(None, None, 3)), vec![0, 3, 6, 9]);
        assert_eq!(raw(arr.slice_step(Some(8), Some(3), -2)), vec![8, 6, 4]);
        assert_eq!(raw(arr.slice_step(None, None, -1)), vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0]);
        assert_eq!(raw(arr.slice_step(Some(-3), None, 1)), vec![7, 8, 9]);
        assert_eq!(raw(arr.slice_step(Some(-1), Some(-4), -1)), vec![9, 8, 7]);
        assert!(arr.slice_step(Some(3), Some(8), -1).is_empty());
        assert!(Array::<Uint8>::default().slice_step(None, None, -1).is_empty());
    }

    #[test]
    fn slicing_with_huge_step() {
        let arr = digits();
        assert_eq!(raw(arr.slice_step(Some(1), None, isize::MAX)), vec![1]);
        assert_eq!(raw(arr.slice_step(None, None, isize::MAX)), vec![0]);
        assert_eq!(raw(arr.slice_step(None, None, isize::MIN)), vec![9]);
        assert_eq!(raw(arr.slice_step(Some(isize::MIN), Some(isize::MAX), isize::MAX)), vec![0]);
    }

    #[test]
    #[should_panic]
    fn zero_step() {
        digits().slice_step(None, None, 0);
    }

    #[test]
    fn json() -> Result<()> {
        let arr = Array::<AntelopeString>::from_values(["a", "bc"])?;
        assert_eq!(arr.to_json(), json!(["a", "bc"]));
        assert_eq!(Array::<AntelopeString>::from_json(&json!(["a", "bc"]))?, arr);
        assert_eq!(arr.values(), vec!["a".to_string(), "bc".to_string()]);
        Ok(())
    }
}
