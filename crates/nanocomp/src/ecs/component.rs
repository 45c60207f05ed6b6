//! # Component Sets
//!
//! The set of component types an entity can carry is fixed at compile time.
//! A set is a generated record with one optional slot per declared type:
//!
//! ```text
//! GameComponents {
//!     position: Option<Position>,
//!     velocity: Option<Velocity>,
//!     health:   Option<Health>,
//! }
//! ```
//!
//! Typed access resolves to a field through [`Stores<C>`], so there is no
//! runtime type dispatch and no per-component allocation.

/// A fixed, compile-time set of component types.
///
/// Implemented by the record generated with [`component_set!`](crate::component_set).
/// Every slot starts empty (`Default`).
pub trait ComponentSet: Default + 'static {
    /// Number of component types declared in the set.
    const COUNT: usize;

    /// Returns the mask of slots that currently hold a value.
    fn signature(&self) -> Signature;

    /// Drops every held component, leaving all slots empty.
    fn clear(&mut self);
}

/// Slot access for one declared component type `C`.
///
/// A set implements this exactly once per declared type. Declaring the same
/// type twice is rejected at compile time as conflicting implementations.
pub trait Stores<C>: ComponentSet {
    /// Bit position of `C` in a [`Signature`].
    const INDEX: usize;

    /// The slot for `C`.
    fn slot(&self) -> &Option<C>;

    /// The slot for `C`, mutably.
    fn slot_mut(&mut self) -> &mut Option<C>;
}

/// Bitmask of present component slots (up to 64 component types).
///
/// Derived from the slots on demand, so it always reflects what the entity
/// actually holds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Signature(u64);

impl Signature {
    /// Maximum number of component types a set may declare.
    pub const CAPACITY: usize = 64;

    /// Signature with no components.
    pub const EMPTY: Self = Self(0);

    /// Creates a signature from its raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Sets the bit for a slot index.
    ///
    /// # Arguments
    ///
    /// * `index` - The slot index (0-63); larger indices are ignored
    #[inline]
    pub fn insert(&mut self, index: usize) {
        if index < Self::CAPACITY {
            self.0 |= 1 << index;
        }
    }

    /// Clears the bit for a slot index. Out-of-range indices are ignored.
    #[inline]
    pub fn remove(&mut self, index: usize) {
        if index < Self::CAPACITY {
            self.0 &= !(1 << index);
        }
    }

    /// Returns a copy with the bit for `C` set.
    ///
    /// ```rust,ignore
    /// let movable = Signature::EMPTY
    ///     .with::<GameComponents, Position>()
    ///     .with::<GameComponents, Velocity>();
    /// ```
    #[inline]
    #[must_use]
    pub fn with<S, C>(mut self) -> Self
    where
        S: Stores<C>,
    {
        self.insert(S::INDEX);
        self
    }

    /// Checks the bit for a slot index.
    #[inline]
    #[must_use]
    pub const fn contains_index(self, index: usize) -> bool {
        index < Self::CAPACITY && (self.0 & (1 << index)) != 0
    }

    /// Checks whether the slot for `C` is marked present.
    #[inline]
    #[must_use]
    pub fn contains<S, C>(self) -> bool
    where
        S: Stores<C>,
    {
        self.contains_index(S::INDEX)
    }

    /// Returns `true` if every bit of `other` is also set in `self`.
    #[inline]
    #[must_use]
    pub const fn is_superset(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Number of present components.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Returns `true` if no component is present.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

/// Declares a component set: a record with one optional slot per type.
///
/// Field names name the slots; each type may appear once. At most
/// [`Signature::CAPACITY`] types are accepted.
///
/// # Example
///
/// ```rust,ignore
/// use nanocomp::{component_set, Registry};
///
/// #[derive(Debug, PartialEq)]
/// struct Position { x: f32, y: f32 }
///
/// #[derive(Debug, PartialEq)]
/// struct Name(String);
///
/// component_set! {
///     pub struct GameComponents {
///         position: Position,
///         name: Name,
///     }
/// }
///
/// let mut registry: Registry<GameComponents> = Registry::new();
/// registry.new_entity().add(Position { x: 1.0, y: 1.0 });
/// ```
#[macro_export]
macro_rules! component_set {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field:ident : $ty:ty
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field: ::core::option::Option<$ty>,
            )+
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $( $field: ::core::option::Option::None, )+
                }
            }
        }

        const _: () = {
            #[allow(non_camel_case_types)]
            enum __ComponentSlot {
                $($field),+
            }

            impl $crate::ComponentSet for $name {
                const COUNT: usize = [$(__ComponentSlot::$field as usize),+].len();

                fn signature(&self) -> $crate::Signature {
                    let mut signature = $crate::Signature::EMPTY;
                    $(
                        if self.$field.is_some() {
                            signature.insert(__ComponentSlot::$field as usize);
                        }
                    )+
                    signature
                }

                fn clear(&mut self) {
                    $( self.$field = ::core::option::Option::None; )+
                }
            }

            $(
                impl $crate::Stores<$ty> for $name {
                    const INDEX: usize = __ComponentSlot::$field as usize;

                    #[inline]
                    fn slot(&self) -> &::core::option::Option<$ty> {
                        &self.$field
                    }

                    #[inline]
                    fn slot_mut(&mut self) -> &mut ::core::option::Option<$ty> {
                        &mut self.$field
                    }
                }
            )+

            assert!(
                <$name as $crate::ComponentSet>::COUNT <= $crate::Signature::CAPACITY,
                "a component set holds at most 64 component types"
            );
        };
    };
}
