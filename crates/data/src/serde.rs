use serde::de::value::MapAccessDeserializer;
use serde::de::{IgnoredAny, MapAccess, SeqAccess};
use serde::Deserialize;
use std::marker::PhantomData;
use std::str::FromStr;


struct LenientParser<T> {
    phantom_data: PhantomData<T>
}


impl <T> LenientParser<T> {
    pub fn new() -> Self {
        Self {
            phantom_data: PhantomData
        }
    }

    fn parse(v: impl ToString) -> Option<T>
    where
        T: FromStr
    {
        T::from_str(v.to_string().trim()).ok()
    }
}


impl <'de, T: FromStr> serde::de::Visitor<'de> for LenientParser<T> {
    type Value = Option<T>;

    fn expecting(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "an optional number or string representing {}", std::any::type_name::<T>())
    }

    fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Self::parse(v))
    }

    fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Self::parse(v))
    }

    fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Self::parse(v))
    }

    fn visit_u128<E>(self, v: u128) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Self::parse(v))
    }

    fn visit_f64<E>(self, _v: f64) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_bool<E>(self, _v: bool) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(None)
    }

    // Integers wider than 64 bits arrive as a private number map
    // under serde_json's `arbitrary_precision`.
    fn visit_map<A>(self, map: A) -> Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        match serde_json::Value::deserialize(MapAccessDeserializer::new(map))? {
            serde_json::Value::Number(number) => Ok(Self::parse(number)),
            _ => Ok(None)
        }
    }
}


/// Decodes a JSON number or decimal string into `T`.
///
/// Values that can't be converted (malformed strings, floats, objects)
/// become `None` instead of failing the whole document.
pub fn decode_lenient_option<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where D: serde::Deserializer<'de>,
      T: FromStr
{
    deserializer.deserialize_any(LenientParser::<T>::new())
}


#[cfg(test)]
mod tests {
    use serde::Deserialize;


    #[derive(Deserialize)]
    struct Amounts {
        #[serde(deserialize_with = "super::decode_lenient_option", default)]
        nonce: Option<u64>,
        #[serde(deserialize_with = "super::decode_lenient_option", default)]
        tip: Option<u128>
    }


    fn parse(json: &str) -> Amounts {
        serde_json::from_str(json).unwrap()
    }


    #[test]
    fn numbers_and_strings() {
        let amounts = parse(r#"{"nonce": 7, "tip": "340282366920938463463374607431768211455"}"#);
        assert_eq!(amounts.nonce, Some(7));
        assert_eq!(amounts.tip, Some(u128::MAX));
    }

    #[test]
    fn wide_numeric_tip() {
        let amounts = parse(r#"{"tip": 20000000000000000000}"#);
        assert_eq!(amounts.tip, Some(20_000_000_000_000_000_000));

        let amounts = parse(r#"{"tip": 340282366920938463463374607431768211455}"#);
        assert_eq!(amounts.tip, Some(u128::MAX));

        let amounts = parse(r#"{"nonce": 20000000000000000000, "tip": 340282366920938463463374607431768211456}"#);
        assert_eq!(amounts.nonce, None);
        assert_eq!(amounts.tip, None);
    }

    #[test]
    fn missing_and_null() {
        let amounts = parse(r#"{"nonce": null}"#);
        assert_eq!(amounts.nonce, None);
        assert_eq!(amounts.tip, None);
    }

    #[test]
    fn unconvertible_values_are_dropped() {
        let amounts = parse(r#"{"nonce": "12abc", "tip": {"value": 1}}"#);
        assert_eq!(amounts.nonce, None);
        assert_eq!(amounts.tip, None);

        let amounts = parse(r#"{"nonce": -1, "tip": [1, 2]}"#);
        assert_eq!(amounts.nonce, None);
        assert_eq!(amounts.tip, None);

        let amounts = parse(r#"{"nonce": 1.5, "tip": true}"#);
        assert_eq!(amounts.nonce, None);
        assert_eq!(amounts.tip, None);
    }
}
