//! # Object Attribute Records
//!
//! Every hardware object is described by four 16-bit words:
//!
//! | Word    | Bits    | Field                                        |
//! |---------|---------|----------------------------------------------|
//! | `attr0` | 0-7     | Y coordinate                                 |
//! |         | 8-9     | rendering mode (always 0, regular)           |
//! |         | 10-11   | gfx mode                                     |
//! |         | 12      | mosaic                                       |
//! |         | 13      | colour mode, 0: 16 colours, 1: 256 colours    |
//! |         | 14-15   | shape                                        |
//! | `attr1` | 0-8     | X coordinate                                 |
//! |         | 9-11    | affine index (unused)                        |
//! |         | 12      | horizontal flip                              |
//! |         | 13      | vertical flip                                |
//! |         | 14-15   | size                                         |
//! | `attr2` | 0-9     | tile index                                   |
//! |         | 10-11   | priority                                     |
//! |         | 12-15   | palette bank (16 colour mode only)           |
//! | `attr3` | 0-15    | affine parameter, never written              |
//!
//! Mutators only ever touch their own bit range. Values that don't fit are
//! masked, the way the hardware itself would read them.

use bitfield::bitfield;
use bytemuck::{Pod, Zeroable};

use crate::config::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::error::EncodeError;

pub const X_MASK: u16 = 0x1FF;
pub const Y_MASK: u16 = 0x0FF;
pub const TILE_MASK: u16 = 0x3FF;
pub const PRIORITY_MASK: u8 = 0b11;

bitfield! {
    /// First attribute word: y, rendering flags and shape.
    #[derive(Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(transparent)]
    pub struct Attr0(u16);
    impl Debug;
    u16;
    pub y, set_y: 7, 0;
    pub u8, rendering_mode, set_rendering_mode: 9, 8;
    pub u8, gfx_mode, set_gfx_mode: 11, 10;
    pub mosaic, set_mosaic: 12;
    pub color_256, set_color_256: 13;
    pub u8, shape, set_shape: 15, 14;
}

bitfield! {
    /// Second attribute word: x, flips and size.
    #[derive(Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(transparent)]
    pub struct Attr1(u16);
    impl Debug;
    u16;
    pub x, set_x: 8, 0;
    pub u8, affine_index, set_affine_index: 11, 9;
    pub h_flip, set_h_flip: 12;
    pub v_flip, set_v_flip: 13;
    pub u8, size, set_size: 15, 14;
}

bitfield! {
    /// Third attribute word: tile, priority and palette bank.
    #[derive(Copy, Clone, Default, PartialEq, Eq, Pod, Zeroable)]
    #[repr(transparent)]
    pub struct Attr2(u16);
    impl Debug;
    u16;
    pub tile, set_tile: 9, 0;
    pub u8, priority, set_priority: 11, 10;
    pub u8, palette_bank, set_palette_bank: 15, 12;
}

/// The twelve size × aspect combinations the object hardware can draw.
/// Names read as `Size<width>x<height>`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ShapeClass {
    Size8x8 = 0,
    Size16x16,
    Size32x32,
    Size64x64,
    Size16x8,
    Size32x8,
    Size32x16,
    Size64x32,
    Size8x16,
    Size8x32,
    Size16x32,
    Size32x64,
}

/// `(size, shape)` codes, indexed by `ShapeClass as usize`.
const SHAPE_TABLE: [(u8, u8); 12] = [
    (0, 0), (1, 0), (2, 0), (3, 0),
    (0, 1), (1, 1), (2, 1), (3, 1),
    (0, 2), (1, 2), (2, 2), (3, 2),
];

/// Pixel dimensions `(width, height)`, indexed like [`SHAPE_TABLE`].
const DIMENSION_TABLE: [(u8, u8); 12] = [
    (8, 8), (16, 16), (32, 32), (64, 64),
    (16, 8), (32, 8), (32, 16), (64, 32),
    (8, 16), (8, 32), (16, 32), (32, 64),
];

impl ShapeClass {
    pub const ALL: [ShapeClass; 12] = [
        ShapeClass::Size8x8,
        ShapeClass::Size16x16,
        ShapeClass::Size32x32,
        ShapeClass::Size64x64,
        ShapeClass::Size16x8,
        ShapeClass::Size32x8,
        ShapeClass::Size32x16,
        ShapeClass::Size64x32,
        ShapeClass::Size8x16,
        ShapeClass::Size8x32,
        ShapeClass::Size16x32,
        ShapeClass::Size32x64,
    ];

    /// Hardware `(size, shape)` codes.
    #[inline(always)]
    pub const fn codes(self) -> (u8, u8) {
        SHAPE_TABLE[self as usize]
    }

    #[inline(always)]
    pub const fn dimensions(self) -> (u8, u8) {
        DIMENSION_TABLE[self as usize]
    }

    /// Inverse of [`codes`](Self::codes). Shape code 3 is prohibited by the
    /// hardware and yields `None`.
    pub fn from_codes(size: u8, shape: u8) -> Option<Self> {
        if size > 3 || shape > 2 {
            return None;
        }
        Self::ALL.get((shape * 4 + size) as usize).copied()
    }
}

impl TryFrom<u8> for ShapeClass {
    type Error = EncodeError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .get(raw as usize)
            .copied()
            .ok_or(EncodeError::UnknownShape(raw))
    }
}

/// Logical description of an object, before packing.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ObjectDescriptor {
    pub x: i32,
    pub y: i32,
    pub shape: ShapeClass,
    pub h_flip: bool,
    pub v_flip: bool,
    pub tile_index: u16,
    pub priority: u8,
}

impl ObjectDescriptor {
    pub const fn new(x: i32, y: i32, shape: ShapeClass, tile_index: u16) -> Self {
        Self {
            x,
            y,
            shape,
            h_flip: false,
            v_flip: false,
            tile_index,
            priority: 0,
        }
    }
}

/// One hardware object record, laid out exactly as attribute memory expects.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug, Pod, Zeroable)]
#[repr(C)]
pub struct ObjectRecord {
    pub attr0: Attr0,
    pub attr1: Attr1,
    pub attr2: Attr2,
    pub attr3: u16,
}

/// Width of one record in 16-bit units.
pub const RECORD_HALFWORDS: usize = 4;

impl ObjectRecord {
    /// Pack a descriptor. Colour mode is always 256 colours.
    pub fn encode(desc: &ObjectDescriptor) -> Self {
        let (size, shape) = desc.shape.codes();

        let mut attr0 = Attr0(0);
        attr0.set_color_256(true);
        attr0.set_shape(shape);

        let mut attr1 = Attr1(0);
        attr1.set_h_flip(desc.h_flip);
        attr1.set_v_flip(desc.v_flip);
        attr1.set_size(size);

        let mut attr2 = Attr2(0);
        attr2.set_tile(desc.tile_index & TILE_MASK);
        attr2.set_priority(desc.priority & PRIORITY_MASK);

        let mut record = Self {
            attr0,
            attr1,
            attr2,
            attr3: 0,
        };
        record.set_position(desc.x, desc.y);
        record
    }

    /// A blank record parked just past the bottom-right corner of the screen.
    pub fn hidden() -> Self {
        let mut record = Self::default();
        record.set_position(SCREEN_WIDTH, SCREEN_HEIGHT);
        record
    }

    /// Raw `(x, y)` as stored: x in `[0, 512)`, y in `[0, 256)`.
    #[inline(always)]
    pub fn position(&self) -> (u16, u16) {
        (self.attr1.x(), self.attr0.y())
    }

    /// Store a position; coordinates wrap into the 9-bit x and 8-bit y fields.
    #[inline(always)]
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.attr0.set_y((y as u16) & Y_MASK);
        self.attr1.set_x((x as u16) & X_MASK);
    }

    /// Move relative to the stored (wrapped) position.
    #[inline(always)]
    pub fn move_by(&mut self, dx: i32, dy: i32) {
        let (x, y) = self.position();
        self.set_position(x as i32 + dx, y as i32 + dy);
    }

    /// Update either flip flag; `None` leaves that flag untouched.
    pub fn set_flip(&mut self, horizontal: Option<bool>, vertical: Option<bool>) {
        if let Some(h) = horizontal {
            self.attr1.set_h_flip(h);
        }
        if let Some(v) = vertical {
            self.attr1.set_v_flip(v);
        }
    }

    /// `(horizontal, vertical)`
    #[inline(always)]
    pub fn flip(&self) -> (bool, bool) {
        (self.attr1.h_flip(), self.attr1.v_flip())
    }

    /// Replace the tile index, masked to 10 bits.
    #[inline(always)]
    pub fn set_tile_offset(&mut self, offset: u16) {
        self.attr2.set_tile(offset & TILE_MASK);
    }

    #[inline(always)]
    pub fn tile_index(&self) -> u16 {
        self.attr2.tile()
    }

    #[inline(always)]
    pub fn priority(&self) -> u8 {
        self.attr2.priority()
    }

    #[inline(always)]
    pub fn is_256_color(&self) -> bool {
        self.attr0.color_256()
    }

    pub fn shape_class(&self) -> Option<ShapeClass> {
        ShapeClass::from_codes(self.attr1.size(), self.attr0.shape())
    }

    /// Unpack into a descriptor with the raw (wrapped) coordinates.
    pub fn decode(&self) -> Option<ObjectDescriptor> {
        let (x, y) = self.position();
        let (h_flip, v_flip) = self.flip();
        Some(ObjectDescriptor {
            x: x as i32,
            y: y as i32,
            shape: self.shape_class()?,
            h_flip,
            v_flip,
            tile_index: self.tile_index(),
            priority: self.priority(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player_ship() -> ObjectDescriptor {
        ObjectDescriptor::new(112, 144, ShapeClass::Size16x16, 0)
    }

    #[test]
    fn encodes_reference_layout() {
        let desc = ObjectDescriptor {
            x: 52,
            y: 20,
            shape: ShapeClass::Size32x8,
            h_flip: true,
            v_flip: false,
            tile_index: 32,
            priority: 2,
        };
        let record = ObjectRecord::encode(&desc);

        // y | 256 colour | shape 1
        assert_eq!(record.attr0.0, 20 | (1 << 13) | (1 << 14));
        // x | h flip | size 1
        assert_eq!(record.attr1.0, 52 | (1 << 12) | (1 << 14));
        // tile | priority
        assert_eq!(record.attr2.0, 32 | (2 << 10));
        assert_eq!(record.attr3, 0);
    }

    #[test]
    fn shape_table_covers_every_class_once() {
        for (raw, class) in ShapeClass::ALL.iter().enumerate() {
            assert_eq!(ShapeClass::try_from(raw as u8), Ok(*class));
            let (size, shape) = class.codes();
            assert_eq!(ShapeClass::from_codes(size, shape), Some(*class));
        }
    }

    #[test]
    fn rejects_thirteenth_shape() {
        assert_eq!(ShapeClass::try_from(12), Err(EncodeError::UnknownShape(12)));
        assert_eq!(ShapeClass::try_from(0xFF), Err(EncodeError::UnknownShape(0xFF)));
        assert_eq!(ShapeClass::from_codes(0, 3), None);
    }

    #[test]
    fn decode_returns_what_was_encoded() {
        for shape in ShapeClass::ALL {
            let desc = ObjectDescriptor {
                x: 300,
                y: 99,
                shape,
                h_flip: false,
                v_flip: true,
                tile_index: 1000,
                priority: 3,
            };
            assert_eq!(ObjectRecord::encode(&desc).decode(), Some(desc));
        }
    }

    #[test]
    fn set_position_keeps_rendering_bits() {
        let mut record = ObjectRecord::encode(&ObjectDescriptor {
            shape: ShapeClass::Size64x32,
            h_flip: true,
            v_flip: true,
            ..player_ship()
        });
        let before = record;

        record.set_position(-16, -16);

        assert_eq!(record.position(), (496, 240));
        assert_eq!(record.attr0.0 & 0xFF00, before.attr0.0 & 0xFF00);
        assert_eq!(record.attr1.0 & 0xFE00, before.attr1.0 & 0xFE00);
        assert_eq!(record.attr2, before.attr2);
    }

    #[test]
    fn set_flip_keeps_position() {
        let mut record = ObjectRecord::encode(&player_ship());
        record.set_flip(Some(true), None);
        assert_eq!(record.flip(), (true, false));
        record.set_flip(None, Some(true));
        assert_eq!(record.flip(), (true, true));
        record.set_flip(Some(false), None);
        assert_eq!(record.flip(), (false, true));
        assert_eq!(record.position(), (112, 144));
        assert_eq!(record.shape_class(), Some(ShapeClass::Size16x16));
    }

    #[test]
    fn tile_offset_is_masked() {
        let mut record = ObjectRecord::encode(&ObjectDescriptor {
            priority: 3,
            ..player_ship()
        });
        record.set_tile_offset(1024 + 44);
        assert_eq!(record.tile_index(), 44);
        assert_eq!(record.priority(), 3);
    }

    #[test]
    fn move_by_wraps_through_zero() {
        let mut record = ObjectRecord::encode(&ObjectDescriptor::new(0, 0, ShapeClass::Size8x8, 40));
        record.move_by(-1, -1);
        assert_eq!(record.position(), (511, 255));
        record.move_by(2, 2);
        assert_eq!(record.position(), (1, 1));
    }

    #[test]
    fn hidden_record_is_off_screen() {
        let (x, y) = ObjectRecord::hidden().position();
        assert_eq!((x as i32, y as i32), (SCREEN_WIDTH, SCREEN_HEIGHT));
    }
}
