use alloc::borrow::ToOwned;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec::Vec;
use core::hash::BuildHasher;

use super::{Dict, List, Optional, Primitive, Reflect};
use crate::node::Node;

// -----------------------------------------------------------------------------
// Primitives

macro_rules! impl_integer {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            $crate::__impl_reflect_cast_fn!(Value);
        }

        impl Primitive for $ty {
            fn to_node(&self) -> Node {
                match i64::try_from(*self) {
                    Ok(value) => Node::Int(value),
                    Err(_) => Node::UInt(*self as u64),
                }
            }

            fn set_node(&mut self, node: &Node) -> Result<(), &'static str> {
                const EXPECTED: &str = concat!("an integer in range of `", stringify!($ty), "`");

                let value = match *node {
                    Node::Int(value) => <$ty>::try_from(value).ok(),
                    Node::UInt(value) => <$ty>::try_from(value).ok(),
                    _ => None,
                };
                *self = value.ok_or(EXPECTED)?;
                Ok(())
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! impl_float {
    ($($ty:ty),* $(,)?) => {$(
        impl Reflect for $ty {
            $crate::__impl_reflect_cast_fn!(Value);
        }

        impl Primitive for $ty {
            #[inline]
            fn to_node(&self) -> Node {
                Node::Float(f64::from(*self))
            }

            fn set_node(&mut self, node: &Node) -> Result<(), &'static str> {
                let value = node.as_f64().ok_or("a number")?;
                // Infinities and NaN carry over; finite values must fit.
                if value.is_finite() && value.abs() > f64::from(<$ty>::MAX) {
                    return Err(concat!("a number in range of `", stringify!($ty), "`"));
                }
                *self = value as $ty;
                Ok(())
            }
        }
    )*};
}

impl_float!(f32, f64);

impl Reflect for bool {
    crate::__impl_reflect_cast_fn!(Value);
}

impl Primitive for bool {
    #[inline]
    fn to_node(&self) -> Node {
        Node::Bool(*self)
    }

    fn set_node(&mut self, node: &Node) -> Result<(), &'static str> {
        *self = node.as_bool().ok_or("a boolean")?;
        Ok(())
    }
}

impl Reflect for char {
    crate::__impl_reflect_cast_fn!(Value);
}

impl Primitive for char {
    #[inline]
    fn to_node(&self) -> Node {
        Node::String(String::from(*self))
    }

    fn set_node(&mut self, node: &Node) -> Result<(), &'static str> {
        const EXPECTED: &str = "a single-character string";

        let mut chars = node.as_str().ok_or(EXPECTED)?.chars();
        match (chars.next(), chars.next()) {
            (Some(value), None) => {
                *self = value;
                Ok(())
            }
            _ => Err(EXPECTED),
        }
    }
}

impl Reflect for String {
    crate::__impl_reflect_cast_fn!(Value);
}

impl Primitive for String {
    #[inline]
    fn to_node(&self) -> Node {
        Node::String(self.clone())
    }

    fn set_node(&mut self, node: &Node) -> Result<(), &'static str> {
        let value = node.as_str().ok_or("a string")?;
        self.clear();
        self.push_str(value);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Option

impl<T: Reflect + Default> Reflect for Option<T> {
    crate::__impl_reflect_cast_fn!(Optional);

    #[inline]
    fn is_null(&self) -> bool {
        self.is_none()
    }
}

impl<T: Reflect + Default> Optional for Option<T> {
    #[inline]
    fn value(&self) -> Option<&dyn Reflect> {
        self.as_ref().map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn value_mut(&mut self) -> Option<&mut dyn Reflect> {
        self.as_mut().map(|value| value as &mut dyn Reflect)
    }

    #[inline]
    fn clear(&mut self) {
        *self = None;
    }

    #[inline]
    fn get_or_insert_default(&mut self) -> &mut dyn Reflect {
        self.get_or_insert_with(T::default)
    }
}

// -----------------------------------------------------------------------------
// Vec

impl<T: Reflect + Default> Reflect for Vec<T> {
    crate::__impl_reflect_cast_fn!(List);
}

impl<T: Reflect + Default> List for Vec<T> {
    #[inline]
    fn len(&self) -> usize {
        <[T]>::len(self)
    }

    #[inline]
    fn get(&self, index: usize) -> Option<&dyn Reflect> {
        <[T]>::get(self, index).map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, index: usize) -> Option<&mut dyn Reflect> {
        <[T]>::get_mut(self, index).map(|value| value as &mut dyn Reflect)
    }

    fn push_default(&mut self) -> &mut dyn Reflect {
        self.push(T::default());
        let index = Vec::len(self) - 1;
        &mut self[index]
    }

    #[inline]
    fn truncate(&mut self, len: usize) {
        Vec::truncate(self, len);
    }
}

// -----------------------------------------------------------------------------
// Dictionaries

impl<V: Reflect + Default> Reflect for BTreeMap<String, V> {
    crate::__impl_reflect_cast_fn!(Dict);
}

impl<V: Reflect + Default> Dict for BTreeMap<String, V> {
    #[inline]
    fn len(&self) -> usize {
        BTreeMap::len(self)
    }

    fn keys(&self) -> Vec<String> {
        BTreeMap::keys(self).cloned().collect()
    }

    #[inline]
    fn get(&self, key: &str) -> Option<&dyn Reflect> {
        BTreeMap::get(self, key).map(|value| value as &dyn Reflect)
    }

    #[inline]
    fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect> {
        BTreeMap::get_mut(self, key).map(|value| value as &mut dyn Reflect)
    }

    fn get_or_insert_default(&mut self, key: &str) -> &mut dyn Reflect {
        self.entry(key.to_owned()).or_default()
    }

    fn retain_keys(&mut self, keep: &mut dyn FnMut(&str) -> bool) {
        self.retain(|key, _| keep(key.as_str()));
    }
}

macro_rules! impl_hash_dict {
    ($map:ident) => {
        impl<V, S> Reflect for $map<String, V, S>
        where
            V: Reflect + Default,
            S: BuildHasher + Default + Send + Sync + 'static,
        {
            crate::__impl_reflect_cast_fn!(Dict);
        }

        impl<V, S> Dict for $map<String, V, S>
        where
            V: Reflect + Default,
            S: BuildHasher + Default + Send + Sync + 'static,
        {
            #[inline]
            fn len(&self) -> usize {
                $map::len(self)
            }

            fn keys(&self) -> Vec<String> {
                let mut keys: Vec<String> = $map::keys(self).cloned().collect();
                keys.sort_unstable();
                keys
            }

            #[inline]
            fn get(&self, key: &str) -> Option<&dyn Reflect> {
                $map::get(self, key).map(|value| value as &dyn Reflect)
            }

            #[inline]
            fn get_mut(&mut self, key: &str) -> Option<&mut dyn Reflect> {
                $map::get_mut(self, key).map(|value| value as &mut dyn Reflect)
            }

            fn get_or_insert_default(&mut self, key: &str) -> &mut dyn Reflect {
                self.entry(key.to_owned()).or_default()
            }

            fn retain_keys(&mut self, keep: &mut dyn FnMut(&str) -> bool) {
                self.retain(|key, _| keep(key.as_str()));
            }
        }
    };
}

mod std_hash {
    use super::*;
    use std::collections::HashMap;

    impl_hash_dict!(HashMap);
}

mod hashbrown_hash {
    use super::*;
    use hashbrown::HashMap;

    impl_hash_dict!(HashMap);
}
