//! Described types shared by the unit tests.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::Serializer;
use crate::attributes::standard::{
    EnumName, IndexObject, Indexed, Keyed, LookupObject, OnDeserialized, OnSerialize, Required,
    TypeResolve,
};
use crate::cache::{EnumDescriptor, Mapped, MappedEnum, ReflectionCache, TypeDescriptor};
use crate::definition::SerializationDefinition;
use crate::reflect::{Object, Poly};
use crate::resolver::TypeResolver;

pub(crate) fn serializer() -> Serializer {
    serializer_with(SerializationDefinition::standard())
}

/// A serializer with every shape registered under [`Shape`].
pub(crate) fn serializer_with(definition: SerializationDefinition) -> Serializer {
    let cache = Arc::new(ReflectionCache::new(definition));
    let mut resolver = TypeResolver::new();
    resolver
        .register::<dyn Shape, Circle>(&cache, |c| c)
        .unwrap()
        .register::<dyn Shape, Square>(&cache, |c| c)
        .unwrap()
        .register::<dyn Shape, Line>(&cache, |c| c)
        .unwrap();
    Serializer::new(cache, resolver)
}

// -----------------------------------------------------------------------------
// Leaderboard

#[derive(Debug, Default)]
pub(crate) struct Leaderboard {
    pub name: String,
    pub entries: Vec<Entry>,
}

impl Mapped for Leaderboard {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("name", |b| &b.name, |b| &mut b.name)
            .with(Keyed::new("Name"));
        d.member("entries", |b| &b.entries, |b| &mut b.entries)
            .with(Keyed::new("Entries"));
    }
}
crate::impl_object!(Leaderboard);

#[derive(Debug, Default)]
pub(crate) struct Entry {
    pub player: String,
    pub score: u32,
    pub medal: Medal,
    pub note: Option<String>,
    pub saves: u32,
    pub loaded: bool,
}

impl Mapped for Entry {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("player", |e| &e.player, |e| &mut e.player)
            .with(Keyed::new("Player"))
            .with(Required::non_null());
        d.member("score", |e| &e.score, |e| &mut e.score)
            .with(Keyed::new("Score"));
        d.member("medal", |e| &e.medal, |e| &mut e.medal)
            .with(Keyed::new("Medal"));
        d.member("note", |e| &e.note, |e| &mut e.note)
            .with(Keyed::new("Note"));
        d.callback(OnSerialize, |e| {
            e.saves += 1;
            Ok(())
        });
        d.callback(OnDeserialized, |e| {
            e.loaded = true;
            Ok(())
        });
    }
}
crate::impl_object!(Entry);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) enum Medal {
    #[default]
    Unranked = 0,
    Bronze = 1,
    Silver = 2,
    Gold = 3,
}

impl MappedEnum for Medal {
    fn describe(d: &mut EnumDescriptor<Self>) {
        d.variant(Medal::Unranked, "Unranked");
        d.variant(Medal::Bronze, "Bronze");
        d.variant(Medal::Silver, "Silver");
        d.variant(Medal::Gold, "Gold").with(EnumName::new("gold"));
    }

    fn to_value(self) -> i64 {
        self as i64
    }
}
crate::impl_enum!(Medal);

#[derive(Debug, Default)]
pub(crate) struct Profile {
    pub nickname: Option<String>,
    pub email: Option<String>,
}

impl Mapped for Profile {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("nickname", |p| &p.nickname, |p| &mut p.nickname)
            .with(Keyed::new("Nick"))
            .with(Required::new());
        d.member("email", |p| &p.email, |p| &mut p.email)
            .with(Keyed::new("Email"))
            .with(Required::non_null());
    }
}
crate::impl_object!(Profile);

/// Required without the null check on a member that cannot hold null.
#[derive(Debug, Default)]
pub(crate) struct Motto {
    pub text: String,
}

impl Mapped for Motto {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("text", |m| &m.text, |m| &mut m.text)
            .with(Keyed::new("Text"))
            .with(Required::new());
    }
}
crate::impl_object!(Motto);

#[derive(Debug, Default, PartialEq)]
pub(crate) struct Pair {
    pub first: i32,
    pub second: String,
}

impl Mapped for Pair {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("first", |p| &p.first, |p| &mut p.first)
            .with(Indexed(0));
        d.member("second", |p| &p.second, |p| &mut p.second)
            .with(Indexed(2));
    }
}
crate::impl_object!(Pair);

#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub log: Vec<&'static str>,
    pub fail: bool,
}

impl Mapped for Journal {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.callback(OnDeserialized, |j| {
            j.log.push("first");
            Ok(())
        });
        d.callback(OnDeserialized, |j| {
            if j.fail {
                return Err("journal is sealed".into());
            }
            j.log.push("second");
            Ok(())
        });
        d.callback(OnSerialize, |j| {
            j.log.push("save");
            Ok(())
        });
    }
}
crate::impl_object!(Journal);

// -----------------------------------------------------------------------------
// Invalid descriptions

#[derive(Default)]
pub(crate) struct TwoKeys {
    value: i32,
}

impl Mapped for TwoKeys {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("value", |t| &t.value, |t| &mut t.value)
            .with(Keyed::new("a"))
            .with(Keyed::new("b"));
    }
}
crate::impl_object!(TwoKeys);

#[derive(Default)]
pub(crate) struct Both;

impl Mapped for Both {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.attribute(LookupObject).attribute(IndexObject);
    }
}
crate::impl_object!(Both);

#[derive(Default)]
pub(crate) struct Misplaced {
    first: i32,
    second: i32,
}

impl Mapped for Misplaced {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.attribute(LookupObject);
        d.member("first", |m| &m.first, |m| &mut m.first)
            .with(Keyed::new("First"));
        d.member("second", |m| &m.second, |m| &mut m.second)
            .with(Indexed(0));
    }
}
crate::impl_object!(Misplaced);

#[derive(Default)]
pub(crate) struct Clashing {
    a: i32,
    b: i32,
}

impl Mapped for Clashing {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("a", |c| &c.a, |c| &mut c.a)
            .with(Keyed::new("Same"));
        d.member("b", |c| &c.b, |c| &mut c.b)
            .with(Keyed::new("Same"));
    }
}
crate::impl_object!(Clashing);

#[derive(Default)]
pub(crate) struct Unplaced {
    hidden: i32,
}

impl Mapped for Unplaced {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("hidden", |u| &u.hidden, |u| &mut u.hidden)
            .with(Required::new());
    }
}
crate::impl_object!(Unplaced);

#[derive(Debug, Clone, Copy, Default)]
pub(crate) enum Twins {
    #[default]
    Left,
    Right,
}

impl MappedEnum for Twins {
    fn describe(d: &mut EnumDescriptor<Self>) {
        d.variant(Twins::Left, "Left");
        d.variant(Twins::Right, "Right");
    }

    fn to_value(self) -> i64 {
        1
    }
}
crate::impl_enum!(Twins);

// -----------------------------------------------------------------------------
// Polymorphic

pub(crate) trait Shape: Object {}
crate::impl_polymorphic!(dyn Shape);

#[derive(Debug, Default)]
pub(crate) struct Circle {
    pub radius: f64,
}

impl Mapped for Circle {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("radius", |c| &c.radius, |c| &mut c.radius)
            .with(Keyed::new("Radius"));
    }
}
crate::impl_object!(Circle);
impl Shape for Circle {}

#[derive(Debug, Default)]
pub(crate) struct Square {
    pub side: f64,
}

impl Mapped for Square {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.attribute(TypeResolve::new().with_discriminator("square"));
        d.member("side", |s| &s.side, |s| &mut s.side)
            .with(Keyed::new("Side"));
    }
}
crate::impl_object!(Square);
impl Shape for Square {}

#[derive(Debug, Default)]
pub(crate) struct Line {
    pub length: f64,
}

impl Mapped for Line {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.attribute(TypeResolve::new().with_discriminator("line"));
        d.member("length", |l| &l.length, |l| &mut l.length)
            .with(Indexed(0));
    }
}
crate::impl_object!(Line);
impl Shape for Line {}

#[derive(Debug, Default)]
pub(crate) struct Drawing {
    pub title: String,
    pub shape: Poly<dyn Shape>,
    pub accent: Poly<dyn Shape>,
}

impl Mapped for Drawing {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("title", |w| &w.title, |w| &mut w.title)
            .with(Keyed::new("Title"));
        d.member("shape", |w| &w.shape, |w| &mut w.shape)
            .with(Keyed::new("Shape"));
        d.member("accent", |w| &w.accent, |w| &mut w.accent)
            .with(Keyed::new("Accent"))
            .with(TypeResolve::new().with_key("kind"));
    }
}
crate::impl_object!(Drawing);

/// A base with a fallback instance.
pub(crate) trait Sticker: Object {
    fn label(&self) -> &str;
}
crate::impl_polymorphic!(dyn Sticker, fallback = Plain);

#[derive(Debug, Default)]
pub(crate) struct Plain {
    pub label: String,
}

impl Mapped for Plain {
    fn describe(d: &mut TypeDescriptor<Self>) {
        d.member("label", |p| &p.label, |p| &mut p.label)
            .with(Keyed::new("Label"));
    }
}
crate::impl_object!(Plain);

impl Sticker for Plain {
    fn label(&self) -> &str {
        &self.label
    }
}

impl Sticker for Circle {
    fn label(&self) -> &str {
        "circle"
    }
}
