//! Typed, direction-aware access to properties packed into [`IntsRef`] flags.
//!
//! An encoded value owns one bit slot per stored direction. Values declared with
//! `store_two_directions` keep a separate slot for the backward direction, so that e.g. the speed
//! uphill and downhill of the same road segment can differ. Reading with `reverse = true` picks
//! the backward slot; values stored for a single direction read the same slot either way.

use std::marker::PhantomData;

use smol_str::SmolStr;
use strum::VariantArray;

use crate::error::{EncodingError, EncodingResult};
use crate::flags::IntsRef;

const WORD_BITS: u32 = u32::BITS;
const MAX_INT_BITS: u32 = 31;

/// Allocates bit slots for encoded values, word after word.
#[derive(Debug, Clone, Default)]
pub struct EncodedValueInitializer {
    index: usize,
    shift: u32,
}

impl EncodedValueInitializer {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_slot(&mut self, bits: u32) -> BitSlot {
        if self.shift + bits > WORD_BITS {
            self.index += 1;
            self.shift = 0;
        }
        let slot = BitSlot::new(self.index, self.shift, bits);
        self.shift += bits;
        slot
    }

    /// Number of `u32` words needed to hold every value allocated so far.
    pub fn required_ints(&self) -> usize {
        if self.shift == 0 {
            self.index
        } else {
            self.index + 1
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BitSlot {
    index: usize,
    shift: u32,
    mask: u32,
}

impl BitSlot {
    fn new(index: usize, shift: u32, bits: u32) -> Self {
        let mask = (((1u64 << bits) - 1) as u32) << shift;
        Self { index, shift, mask }
    }

    #[inline]
    fn read(&self, flags: &IntsRef) -> u32 {
        (flags.get(self.index) & self.mask) >> self.shift
    }

    #[inline]
    fn write(&self, name: &SmolStr, flags: &mut IntsRef, value: u32) -> EncodingResult<()> {
        let len = flags.len();
        let Some(word) = flags.get_mut(self.index) else {
            return Err(EncodingError::FlagsTooShort {
                name: name.clone(),
                required: self.index + 1,
                len,
            });
        };
        *word = (*word & !self.mask) | ((value << self.shift) & self.mask);
        Ok(())
    }
}

/// Integer property stored as an unsigned value in `0..=2^bits-1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntEncodedValue {
    name: SmolStr,
    bits: u32,
    forward: BitSlot,
    backward: Option<BitSlot>,
}

impl IntEncodedValue {
    pub fn new(
        init: &mut EncodedValueInitializer,
        name: &str,
        bits: u32,
        store_two_directions: bool,
    ) -> EncodingResult<Self> {
        if bits == 0 || bits > MAX_INT_BITS {
            return Err(EncodingError::InvalidBits {
                name: name.into(),
                bits,
            });
        }
        let forward = init.next_slot(bits);
        let backward = store_two_directions.then(|| init.next_slot(bits));
        Ok(Self {
            name: name.into(),
            bits,
            forward,
            backward,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn is_store_two_directions(&self) -> bool {
        self.backward.is_some()
    }

    pub fn max_int(&self) -> i32 {
        ((1u64 << self.bits) - 1) as i32
    }

    #[inline]
    fn slot(&self, reverse: bool) -> &BitSlot {
        match (&self.backward, reverse) {
            (Some(backward), true) => backward,
            _ => &self.forward,
        }
    }

    pub fn get_int(&self, reverse: bool, flags: &IntsRef) -> i32 {
        self.slot(reverse).read(flags) as i32
    }

    pub fn set_int(&self, reverse: bool, flags: &mut IntsRef, value: i32) -> EncodingResult<()> {
        if value < 0 || value > self.max_int() {
            return Err(self.out_of_range(f64::from(value), f64::from(self.max_int())));
        }
        self.slot(reverse).write(&self.name, flags, value as u32)
    }

    fn out_of_range(&self, value: f64, max: f64) -> EncodingError {
        EncodingError::ValueOutOfRange {
            name: self.name.clone(),
            value,
            max,
        }
    }
}

/// Single-bit property such as vehicle access or a roundabout marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BooleanEncodedValue {
    int: IntEncodedValue,
}

impl BooleanEncodedValue {
    pub fn new(init: &mut EncodedValueInitializer, name: &str, store_two_directions: bool) -> Self {
        let forward = init.next_slot(1);
        let backward = store_two_directions.then(|| init.next_slot(1));
        Self {
            int: IntEncodedValue {
                name: name.into(),
                bits: 1,
                forward,
                backward,
            },
        }
    }

    pub fn name(&self) -> &str {
        self.int.name()
    }

    pub fn is_store_two_directions(&self) -> bool {
        self.int.is_store_two_directions()
    }

    pub fn get_bool(&self, reverse: bool, flags: &IntsRef) -> bool {
        self.int.slot(reverse).read(flags) == 1
    }

    pub fn set_bool(&self, reverse: bool, flags: &mut IntsRef, value: bool) -> EncodingResult<()> {
        self.int
            .slot(reverse)
            .write(&self.int.name, flags, u32::from(value))
    }
}

/// Decimal property stored as an integer multiple of `factor`.
///
/// Written values are rounded to the nearest multiple of `factor`.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimalEncodedValue {
    int: IntEncodedValue,
    factor: f64,
}

impl DecimalEncodedValue {
    pub fn new(
        init: &mut EncodedValueInitializer,
        name: &str,
        bits: u32,
        factor: f64,
        store_two_directions: bool,
    ) -> EncodingResult<Self> {
        if !(factor.is_finite() && factor > 0.0) {
            return Err(EncodingError::InvalidFactor {
                name: name.into(),
                factor,
            });
        }
        let int = IntEncodedValue::new(init, name, bits, store_two_directions)?;
        Ok(Self { int, factor })
    }

    pub fn name(&self) -> &str {
        self.int.name()
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_store_two_directions(&self) -> bool {
        self.int.is_store_two_directions()
    }

    pub fn max_decimal(&self) -> f64 {
        f64::from(self.int.max_int()) * self.factor
    }

    pub fn get_decimal(&self, reverse: bool, flags: &IntsRef) -> f64 {
        f64::from(self.int.get_int(reverse, flags)) * self.factor
    }

    pub fn set_decimal(
        &self,
        reverse: bool,
        flags: &mut IntsRef,
        value: f64,
    ) -> EncodingResult<()> {
        let steps = (value / self.factor).round();
        if !steps.is_finite() || steps < 0.0 || steps > f64::from(self.int.max_int()) {
            return Err(self.int.out_of_range(value, self.max_decimal()));
        }
        self.int
            .slot(reverse)
            .write(&self.int.name, flags, steps as u32)
    }
}

/// Enumeration-like types that can be stored in an [`EnumEncodedValue`].
///
/// A variant is stored as its position in [`VariantArray::VARIANTS`], so reordering the variants
/// changes the meaning of already encoded flags.
pub trait EnumValue: VariantArray + Copy + PartialEq {}

impl<T> EnumValue for T where T: VariantArray + Copy + PartialEq {}

/// Enumerated property such as a road class or a surface type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEncodedValue<T: EnumValue> {
    int: IntEncodedValue,
    _variants: PhantomData<T>,
}

impl<T: EnumValue> EnumEncodedValue<T> {
    pub fn new(
        init: &mut EncodedValueInitializer,
        name: &str,
        store_two_directions: bool,
    ) -> EncodingResult<Self> {
        let count = T::VARIANTS.len() as u32;
        if count == 0 {
            return Err(EncodingError::EmptyEnum { name: name.into() });
        }
        let bits = (WORD_BITS - (count - 1).leading_zeros()).max(1);
        let int = IntEncodedValue::new(init, name, bits, store_two_directions)?;
        Ok(Self {
            int,
            _variants: PhantomData,
        })
    }

    pub fn name(&self) -> &str {
        self.int.name()
    }

    pub fn values(&self) -> &'static [T] {
        T::VARIANTS
    }

    pub fn is_store_two_directions(&self) -> bool {
        self.int.is_store_two_directions()
    }

    /// Reads the variant, falling back to the first variant for ordinals that name no variant.
    pub fn get_enum(&self, reverse: bool, flags: &IntsRef) -> T {
        let ordinal = self.int.slot(reverse).read(flags) as usize;
        T::VARIANTS
            .get(ordinal)
            .copied()
            .unwrap_or(T::VARIANTS[0])
    }

    pub fn set_enum(&self, reverse: bool, flags: &mut IntsRef, value: T) -> EncodingResult<()> {
        let ordinal = T::VARIANTS
            .iter()
            .position(|v| *v == value)
            .ok_or_else(|| EncodingError::UnknownVariant {
                name: self.int.name.clone(),
            })?;
        self.int
            .slot(reverse)
            .write(&self.int.name, flags, ordinal as u32)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use strum::VariantArray;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, VariantArray)]
    enum Surface {
        Asphalt,
        Gravel,
        Dirt,
        Sand,
        Cobblestone,
    }

    #[test]
    fn test_initializer_packs_words() {
        let mut init = EncodedValueInitializer::new();
        assert_eq!(init.required_ints(), 0);
        let a = IntEncodedValue::new(&mut init, "a", 31, false).unwrap();
        assert_eq!(init.required_ints(), 1);
        let b = IntEncodedValue::new(&mut init, "b", 2, false).unwrap();
        assert_eq!(init.required_ints(), 2);

        let mut flags = IntsRef::new(init.required_ints());
        a.set_int(false, &mut flags, a.max_int()).unwrap();
        b.set_int(false, &mut flags, 3).unwrap();
        assert_eq!(a.get_int(false, &flags), a.max_int());
        assert_eq!(b.get_int(false, &flags), 3);
        assert_eq!(flags.as_slice(), &[0x7fff_ffff, 3]);
    }

    #[test]
    fn test_int_rejects_invalid_bits_and_values() {
        let mut init = EncodedValueInitializer::new();
        assert!(matches!(
            IntEncodedValue::new(&mut init, "zero", 0, false),
            Err(EncodingError::InvalidBits { bits: 0, .. })
        ));
        let lanes = IntEncodedValue::new(&mut init, "lanes", 3, false).unwrap();
        let mut flags = IntsRef::new(1);
        assert!(lanes.set_int(false, &mut flags, 8).is_err());
        assert!(lanes.set_int(false, &mut flags, -1).is_err());
        assert_eq!(flags.get(0), 0);
    }

    #[test]
    fn test_bool_two_directions() {
        let mut init = EncodedValueInitializer::new();
        let access = BooleanEncodedValue::new(&mut init, "car_access", true);
        let roundabout = BooleanEncodedValue::new(&mut init, "roundabout", false);
        let mut flags = IntsRef::new(init.required_ints());

        access.set_bool(false, &mut flags, true).unwrap();
        assert!(access.get_bool(false, &flags));
        assert!(!access.get_bool(true, &flags));

        roundabout.set_bool(true, &mut flags, true).unwrap();
        assert!(roundabout.get_bool(false, &flags));
        assert!(roundabout.get_bool(true, &flags));
    }

    #[test]
    fn test_decimal_rounds_to_factor() {
        let mut init = EncodedValueInitializer::new();
        let speed = DecimalEncodedValue::new(&mut init, "car_speed", 5, 5.0, true).unwrap();
        let mut flags = IntsRef::new(init.required_ints());

        speed.set_decimal(false, &mut flags, 52.0).unwrap();
        speed.set_decimal(true, &mut flags, 21.0).unwrap();
        assert_relative_eq!(speed.get_decimal(false, &flags), 50.0);
        assert_relative_eq!(speed.get_decimal(true, &flags), 20.0);
        assert_relative_eq!(speed.max_decimal(), 155.0);
        assert!(speed.set_decimal(false, &mut flags, 160.0).is_err());
        assert!(speed.set_decimal(false, &mut flags, f64::NAN).is_err());
    }

    #[test]
    fn test_decimal_rejects_invalid_factor() {
        let mut init = EncodedValueInitializer::new();
        assert!(matches!(
            DecimalEncodedValue::new(&mut init, "speed", 5, 0.0, false),
            Err(EncodingError::InvalidFactor { .. })
        ));
    }

    #[test]
    fn test_enum_uses_minimal_bits() {
        let mut init = EncodedValueInitializer::new();
        let surface = EnumEncodedValue::<Surface>::new(&mut init, "surface", false).unwrap();
        assert_eq!(surface.int.bits(), 3);
        assert_eq!(surface.values().len(), 5);

        let mut flags = IntsRef::new(init.required_ints());
        assert_eq!(surface.get_enum(false, &flags), Surface::Asphalt);
        surface.set_enum(false, &mut flags, Surface::Cobblestone).unwrap();
        assert_eq!(surface.get_enum(false, &flags), Surface::Cobblestone);
        assert_eq!(surface.get_enum(true, &flags), Surface::Cobblestone);

        // ordinal 7 names no variant
        *flags.get_mut(0).unwrap() = 7;
        assert_eq!(surface.get_enum(false, &flags), Surface::Asphalt);
    }

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Turn {
        Left,
        Right,
        UTurn,
    }

    impl VariantArray for Turn {
        const VARIANTS: &'static [Self] = &[Self::Left, Self::Right];
    }

    #[test]
    fn test_enum_rejects_unlisted_variant() {
        let mut init = EncodedValueInitializer::new();
        let turn = EnumEncodedValue::<Turn>::new(&mut init, "turn", false).unwrap();
        let mut flags = IntsRef::new(init.required_ints());
        turn.set_enum(false, &mut flags, Turn::Right).unwrap();

        let err = turn.set_enum(false, &mut flags, Turn::UTurn).unwrap_err();
        assert_eq!(
            err,
            EncodingError::UnknownVariant {
                name: "turn".into()
            }
        );
        assert_eq!(err.to_string(), "encoded value turn has no ordinal for this variant");
        assert_eq!(turn.get_enum(false, &flags), Turn::Right);
    }

    #[test]
    fn test_writes_past_flag_width_are_rejected() {
        let mut init = EncodedValueInitializer::new();
        let max_speed = IntEncodedValue::new(&mut init, "max_speed", 31, false).unwrap();
        let access = BooleanEncodedValue::new(&mut init, "car_access", true);
        assert_eq!(init.required_ints(), 2);

        let mut flags = IntsRef::new(1);
        max_speed.set_int(false, &mut flags, 130).unwrap();
        assert!(matches!(
            access.set_bool(false, &mut flags, true),
            Err(EncodingError::FlagsTooShort {
                required: 2,
                len: 1,
                ..
            })
        ));
        assert_eq!(flags.len(), 1);
        assert_eq!(flags.as_slice(), &[130]);
    }
}
