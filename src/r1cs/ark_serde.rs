//! serde adapters that encode arkworks values with their canonical compressed form.

pub mod vec {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{de::Error as DeError, de::SeqAccess, ser::Error, ser::SerializeSeq};
    use serde::{Deserializer, Serializer};

    pub fn serialize<S, T>(data: &[T], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut seq = serializer.serialize_seq(Some(data.len()))?;
        for item in data {
            let mut bytes = vec![];
            item.serialize_compressed(&mut bytes).map_err(S::Error::custom)?;
            seq.serialize_element(&bytes)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        struct VecVisitor<T> {
            _marker: std::marker::PhantomData<T>,
        }

        impl<'de, T: CanonicalDeserialize> serde::de::Visitor<'de> for VecVisitor<T> {
            type Value = Vec<T>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a sequence of encoded field elements")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut vec = Vec::new();
                while let Some(bytes) = seq.next_element::<Vec<u8>>()? {
                    let item = T::deserialize_compressed(&bytes[..]).map_err(A::Error::custom)?;
                    vec.push(item);
                }
                Ok(vec)
            }
        }

        deserializer.deserialize_seq(VecVisitor {
            _marker: std::marker::PhantomData,
        })
    }
}

pub mod vec_vec {
    use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
    use serde::{de::Error as DeError, de::SeqAccess, ser::Error, ser::SerializeSeq};
    use serde::{Deserializer, Serializer};

    /// Each row is written as one byte string holding its elements back to back.
    pub fn serialize<S, T>(data: &[Vec<T>], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: CanonicalSerialize,
    {
        let mut seq = serializer.serialize_seq(Some(data.len()))?;
        for row in data {
            let mut row_bytes = Vec::new();
            for item in row {
                item.serialize_compressed(&mut row_bytes).map_err(S::Error::custom)?;
            }
            seq.serialize_element(&row_bytes)?;
        }
        seq.end()
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Vec<Vec<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: CanonicalDeserialize,
    {
        struct RowsVisitor<T> {
            _marker: std::marker::PhantomData<T>,
        }

        impl<'de, T: CanonicalDeserialize> serde::de::Visitor<'de> for RowsVisitor<T> {
            type Value = Vec<Vec<T>>;

            fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                formatter.write_str("a sequence of encoded field element rows")
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let mut rows = Vec::new();
                while let Some(row_bytes) = seq.next_element::<Vec<u8>>()? {
                    let mut row = Vec::new();
                    let mut cursor = std::io::Cursor::new(row_bytes);
                    while (cursor.position() as usize) < cursor.get_ref().len() {
                        let item =
                            T::deserialize_compressed(&mut cursor).map_err(A::Error::custom)?;
                        row.push(item);
                    }
                    rows.push(row);
                }
                Ok(rows)
            }
        }

        deserializer.deserialize_seq(RowsVisitor {
            _marker: std::marker::PhantomData,
        })
    }
}
