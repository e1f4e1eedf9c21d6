/// The 64x32 monochrome plane, packed eight pixels to a byte with the
/// leftmost pixel in the most significant bit. Pixels are addressed row-major
/// so pixel (x, y) is bit `y * 64 + x` of the plane.
pub const SCREEN_WIDTH: usize = 64;
pub const SCREEN_HEIGHT: usize = 32;
pub const SCREEN_PIXELS: usize = SCREEN_WIDTH * SCREEN_HEIGHT;
pub const SCREEN_BUFFER_SIZE: usize = SCREEN_PIXELS / 8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    buffer: [u8; SCREEN_BUFFER_SIZE],
}

impl Framebuffer {
    pub fn new() -> Self {
        Framebuffer {
            buffer: [0; SCREEN_BUFFER_SIZE],
        }
    }

    pub fn clear(&mut self) {
        self.buffer = [0; SCREEN_BUFFER_SIZE];
    }

    /// packed plane, as handed to renderers
    pub fn as_bytes(&self) -> &[u8; SCREEN_BUFFER_SIZE] {
        &self.buffer
    }

    /// coordinates wrap around both edges
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let index = Self::index(x, y);
        self.buffer[index / 8] & Self::mask(index) != 0
    }

    pub fn lit_count(&self) -> usize {
        self.buffer.iter().map(|b| b.count_ones() as usize).sum()
    }

    /// XOR an 8-pixel-wide sprite onto the plane with its top left corner at
    /// (x, y). Rows and columns that run off an edge wrap to the opposite one.
    /// Returns true if any pixel went from set to unset.
    pub fn draw_sprite(&mut self, x: u8, y: u8, rows: &[u8]) -> bool {
        let mut collision = false;
        for (dy, row) in rows.iter().enumerate() {
            for dx in 0..8 {
                if row & (0x80 >> dx) != 0 {
                    collision |= self.flip(x as usize + dx, y as usize + dy);
                }
            }
        }
        collision
    }

    /// toggle one pixel; returns true if it was set beforehand
    fn flip(&mut self, x: usize, y: usize) -> bool {
        let index = Self::index(x, y);
        let mask = Self::mask(index);
        let was_set = self.buffer[index / 8] & mask != 0;
        self.buffer[index / 8] ^= mask;
        was_set
    }

    fn index(x: usize, y: usize) -> usize {
        (y % SCREEN_HEIGHT) * SCREEN_WIDTH + (x % SCREEN_WIDTH)
    }

    fn mask(index: usize) -> u8 {
        0x80 >> (index % 8)
    }
}

impl Default for Framebuffer {
    fn default() -> Self {
        Self::new()
    }
}
