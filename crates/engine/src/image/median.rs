use super::Image;

/// Per-column counts; a column never holds more than `2r + 1` samples.
type Column = [u64; 256];
/// Per-window counts; `(2r + 1)²` overflows `u64` for the largest radii.
type Kernel = [u128; 256];

impl Image {
    /// Median filter with a `(2 * window_size + 1)`-wide square window, per channel.
    ///
    /// Column histograms slide down the image and the kernel histogram slides
    /// across each row, so the cost per pixel does not depend on the window size.
    /// Pixels outside the image replicate the nearest edge pixel.
    pub fn blur(&self, window_size: u32) -> Image {
        let mut out = Image::create(self.format, self.width, self.height);
        if window_size == 0 || self.width == 0 || self.height == 0 {
            out.pixels.copy_from_slice(&self.pixels);
            return out;
        }
        for channel in 0..self.channels() {
            median_channel(self, &mut out.pixels, channel, window_size as i64);
        }
        out
    }
}

/// How many positions of `[center - r, center + r]` clamp onto `s` in `0..len`.
fn replicated_count(center: i64, r: i64, s: i64, len: i64) -> u64 {
    let (lo, hi) = (center - r, center + r);
    let start = if s == 0 { lo } else { lo.max(s) };
    let end = if s == len - 1 { hi } else { hi.min(s) };
    (end - start + 1).max(0) as u64
}

fn median_channel(src: &Image, dst: &mut [u8], channel: usize, r: i64) {
    let w = src.width as i64;
    let h = src.height as i64;
    let n = src.channels();
    let at = |x: i64, y: i64| {
        let x = x.clamp(0, w - 1) as usize;
        let y = y.clamp(0, h - 1) as usize;
        (y * w as usize + x) * n + channel
    };
    let window = (2 * r as u128 + 1).pow(2);

    let mut columns: Vec<Column> = vec![[0; 256]; w as usize];
    for (x, column) in columns.iter_mut().enumerate() {
        for sy in 0..h {
            column[src.pixels[at(x as i64, sy)] as usize] += replicated_count(0, r, sy, h);
        }
    }

    for y in 0..h {
        if y > 0 {
            for (x, column) in columns.iter_mut().enumerate() {
                column[src.pixels[at(x as i64, y - 1 - r)] as usize] -= 1;
                column[src.pixels[at(x as i64, y + r)] as usize] += 1;
            }
        }

        let column_at = |x: i64| &columns[x.clamp(0, w - 1) as usize];
        let mut kernel: Kernel = [0; 256];
        for sx in 0..w {
            add(&mut kernel, column_at(sx), replicated_count(0, r, sx, w));
        }
        dst[at(0, y)] = median(&kernel, window);

        for x in 1..w {
            sub(&mut kernel, column_at(x - 1 - r));
            add(&mut kernel, column_at(x + r), 1);
            dst[at(x, y)] = median(&kernel, window);
        }
    }
}

fn add(kernel: &mut Kernel, column: &Column, times: u64) {
    kernel
        .iter_mut()
        .zip(column)
        .for_each(|(k, c)| *k += *c as u128 * times as u128);
}

fn sub(kernel: &mut Kernel, column: &Column) {
    kernel.iter_mut().zip(column).for_each(|(k, c)| *k -= *c as u128);
}

fn median(histogram: &Kernel, count: u128) -> u8 {
    let target = count / 2;
    let mut seen = 0;
    for (value, bin) in histogram.iter().enumerate() {
        seen += bin;
        if seen > target {
            return value as u8;
        }
    }
    255
}
