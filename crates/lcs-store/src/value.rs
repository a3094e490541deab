//! Canonical text form of values passed to `set_property`.

/// A value that can be stored in a property.
///
/// Numbers are written in base 10, booleans as `true`/`false`, and `None`
/// as the empty string.
pub trait PropertyValue {
    fn to_property_string(&self) -> String;
}

macro_rules! display_property_value {
    ($($ty:ty),* $(,)?) => {
        $(
            impl PropertyValue for $ty {
                fn to_property_string(&self) -> String {
                    self.to_string()
                }
            }
        )*
    };
}

display_property_value!(
    str, String, char, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32,
    f64,
);

impl<T: PropertyValue + ?Sized> PropertyValue for &T {
    fn to_property_string(&self) -> String {
        (**self).to_property_string()
    }
}

impl<T: PropertyValue> PropertyValue for Option<T> {
    fn to_property_string(&self) -> String {
        self.as_ref()
            .map(PropertyValue::to_property_string)
            .unwrap_or_default()
    }
}
