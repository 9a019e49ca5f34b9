//! Hand-built entities shared by the unit tests.

use crate::{
    error::ReplicaError,
    sequence::Sequence,
    spec::{IndexSuffix, OffsetByIndex},
    table::{CloneRule, FieldTable, UpdateRule},
    traits::{Clonable, Replicate},
    walk::{CloneWalk, UpdateWalk},
};
use std::{collections::VecDeque, rc::Rc, sync::OnceLock};

///
/// MockObject
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct MockObject {
    pub(crate) name: String,
    pub(crate) value: i32,
}

impl MockObject {
    pub(crate) fn named(name: &str, value: i32) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

impl Clonable for MockObject {
    const PATH: &'static str = concat!(module_path!(), "::MockObject");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<MockObject>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field_with(
                    "name",
                    |o| &o.name,
                    |o| &mut o.name,
                    CloneRule::deep(),
                    UpdateRule::spec::<IndexSuffix>(),
                )
                .field_with(
                    "value",
                    |o| &o.value,
                    |o| &mut o.value,
                    CloneRule::deep(),
                    UpdateRule::spec::<OffsetByIndex<i32>>(),
                )
                .build()
        })
    }
}

///
/// SimpleCompostMockObject
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct SimpleCompostMockObject {
    pub(crate) base: MockObject,
    pub(crate) child: Option<MockObject>,
    pub(crate) immutable: String,
}

impl SimpleCompostMockObject {
    pub(crate) const IMMUTABLE: &'static str = "THIS STRING WON'T CHANGE";
}

impl Default for SimpleCompostMockObject {
    fn default() -> Self {
        Self {
            base: MockObject::default(),
            child: None,
            immutable: Self::IMMUTABLE.to_string(),
        }
    }
}

impl Clonable for SimpleCompostMockObject {
    const PATH: &'static str = concat!(module_path!(), "::SimpleCompostMockObject");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<SimpleCompostMockObject>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field_with(
                    "child",
                    |o| &o.child,
                    |o| &mut o.child,
                    CloneRule::deep(),
                    UpdateRule::exclude(),
                )
                .field_with(
                    "immutable",
                    |o| &o.immutable,
                    |o| &mut o.immutable,
                    CloneRule::copy(),
                    UpdateRule::exclude(),
                )
                .inherit(|o| &o.base, |o| &mut o.base)
                .build()
        })
    }
}

///
/// MockEnum
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub(crate) enum MockEnum {
    #[default]
    One,
    Two,
}

impl MockEnum {
    pub(crate) const fn clone_self(&self) -> Self {
        *self
    }
}

///
/// MockNode
///
/// Polymorphic child slot.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum MockNode {
    Plain(MockObject),
    Simple(SimpleCompostMockObject),
    Compost(Box<CompostMockObject>),
}

impl Replicate for MockNode {
    fn replicate(&self, walk: &mut CloneWalk) -> Result<Self, ReplicaError> {
        Ok(match self {
            Self::Plain(inner) => Self::Plain(inner.replicate(walk)?),
            Self::Simple(inner) => Self::Simple(inner.replicate(walk)?),
            Self::Compost(inner) => Self::Compost(Box::new(inner.as_ref().replicate(walk)?)),
        })
    }

    fn refresh(&mut self, walk: &mut UpdateWalk<'_>) -> Result<(), ReplicaError> {
        match self {
            Self::Plain(inner) => inner.refresh(walk),
            Self::Simple(inner) => inner.refresh(walk),
            Self::Compost(inner) => inner.as_mut().refresh(walk),
        }
    }
}

///
/// CompostMockObject
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct CompostMockObject {
    pub(crate) base: MockObject,
    pub(crate) children: Vec<MockNode>,
    pub(crate) mock_enum: MockEnum,
}

impl Clonable for CompostMockObject {
    const PATH: &'static str = concat!(module_path!(), "::CompostMockObject");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<CompostMockObject>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field("children", |o| &o.children, |o| &mut o.children)
                .field_with(
                    "mock_enum",
                    |o| &o.mock_enum,
                    |o| &mut o.mock_enum,
                    CloneRule::custom("MockEnum::clone_self", MockEnum::clone_self),
                    UpdateRule::leave(),
                )
                .inherit(|o| &o.base, |o| &mut o.base)
                .build()
        })
    }
}

/// Root with a plain child and a simple composite that owns a child of its
/// own, three entity levels deep.
pub(crate) fn three_level_graph() -> CompostMockObject {
    CompostMockObject {
        base: MockObject::named("root", 1),
        children: vec![
            MockNode::Plain(MockObject::named("plain", 2)),
            MockNode::Simple(SimpleCompostMockObject {
                base: MockObject::named("simple", 3),
                child: Some(MockObject::named("grandchild", 4)),
                ..SimpleCompostMockObject::default()
            }),
        ],
        mock_enum: MockEnum::Two,
    }
}

///
/// RingBuffer
///
/// Bounded sequence with no rebuild strategy of its own.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct RingBuffer<T> {
    pub(crate) capacity: usize,
    pub(crate) items: VecDeque<T>,
}

impl<T> RingBuffer<T> {
    pub(crate) fn from_items(capacity: usize, items: impl IntoIterator<Item = T>) -> Self {
        let mut buffer = Self {
            capacity,
            items: VecDeque::with_capacity(capacity),
        };
        for item in items {
            if buffer.items.len() == capacity {
                buffer.items.pop_front();
            }
            buffer.items.push_back(item);
        }

        buffer
    }

    pub(crate) fn refill(&self, items: Vec<T>) -> Self {
        Self::from_items(self.capacity, items)
    }
}

impl<T> Sequence for RingBuffer<T> {
    type Item = T;
    type Iter<'a>
        = std::collections::vec_deque::Iter<'a, T>
    where
        Self: 'a;
    type IterMut<'a>
        = std::collections::vec_deque::IterMut<'a, T>
    where
        Self: 'a;

    const KIND: &'static str = "RingBuffer";

    fn items(&self) -> Self::Iter<'_> {
        self.items.iter()
    }

    fn items_mut(&mut self) -> Self::IterMut<'_> {
        self.items.iter_mut()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

///
/// Journal
///
/// Uses the ring buffer's own (missing) rebuild strategy.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Journal {
    pub(crate) entries: RingBuffer<String>,
}

impl Journal {
    pub(crate) fn with_entries(entries: &[&str]) -> Self {
        Self {
            entries: RingBuffer::from_items(4, entries.iter().map(ToString::to_string)),
        }
    }
}

impl Clonable for Journal {
    const PATH: &'static str = concat!(module_path!(), "::Journal");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<Journal>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field_with(
                    "entries",
                    |o| &o.entries,
                    |o| &mut o.entries,
                    CloneRule::sequence(),
                    UpdateRule::elements(),
                )
                .build()
        })
    }
}

///
/// Ledger
///
/// Supplies a rebuild strategy for its ring buffer.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Ledger {
    pub(crate) entries: RingBuffer<MockObject>,
}

impl Clonable for Ledger {
    const PATH: &'static str = concat!(module_path!(), "::Ledger");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<Ledger>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field_with(
                    "entries",
                    |o| &o.entries,
                    |o| &mut o.entries,
                    CloneRule::sequence_with(RingBuffer::refill),
                    UpdateRule::elements(),
                )
                .build()
        })
    }
}

///
/// Listing
///
/// Holds a catalog shared between every copy.
///

#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct Catalog {
    pub(crate) title: String,
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Listing {
    pub(crate) catalog: Rc<Catalog>,
    pub(crate) title: String,
}

impl Clonable for Listing {
    const PATH: &'static str = concat!(module_path!(), "::Listing");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<Listing>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field_with(
                    "catalog",
                    |o| &o.catalog,
                    |o| &mut o.catalog,
                    CloneRule::share(),
                    UpdateRule::leave(),
                )
                .field_with(
                    "title",
                    |o| &o.title,
                    |o| &mut o.title,
                    CloneRule::deep(),
                    UpdateRule::spec::<IndexSuffix>(),
                )
                .build()
        })
    }
}

///
/// Sealed
///
/// Cannot produce a fresh instance to clone into.
///

#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct Sealed {
    pub(crate) token: u64,
}

impl Clonable for Sealed {
    const PATH: &'static str = concat!(module_path!(), "::Sealed");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<Sealed>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field("token", |o| &o.token, |o| &mut o.token)
                .build()
        })
    }

    fn allocate() -> Result<Self, ReplicaError> {
        Err(ReplicaError::construction(Self::PATH, "tokens are issued, not copied"))
    }
}

///
/// Holder
///

#[derive(Debug, Default, Eq, PartialEq)]
pub(crate) struct Holder {
    pub(crate) sealed: Option<Sealed>,
}

impl Clonable for Holder {
    const PATH: &'static str = concat!(module_path!(), "::Holder");

    fn field_table() -> &'static FieldTable<Self> {
        static TABLE: OnceLock<FieldTable<Holder>> = OnceLock::new();

        TABLE.get_or_init(|| {
            FieldTable::<Self>::builder(Self::PATH)
                .field("sealed", |o| &o.sealed, |o| &mut o.sealed)
                .build()
        })
    }
}
