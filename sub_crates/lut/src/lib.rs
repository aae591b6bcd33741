//! Color math and 3D lookup table output.

pub mod chroma;
pub mod matrix;
pub mod transfer_functions;

use std::io::Write;

/// A cubic 3D LUT with the same resolution on every axis, covering the
/// input domain [0.0, 1.0] on each axis.
///
/// `table` is in standard raster order: red varies fastest, then green,
/// then blue.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut3D {
    pub resolution: usize,
    pub table: Vec<[f64; 3]>,
}

impl Lut3D {
    /// The index into `table` of the given grid coordinates.
    #[inline]
    pub fn index(&self, r: usize, g: usize, b: usize) -> usize {
        (b * self.resolution * self.resolution) + (g * self.resolution) + r
    }

    /// The grid coordinates of the given index into `table`.
    #[inline]
    pub fn coords(&self, i: usize) -> [usize; 3] {
        let res = self.resolution;
        [i % res, (i / res) % res, i / (res * res)]
    }

    /// The input value at the given grid coordinate along one axis.
    #[inline]
    pub fn input_value(&self, i: usize) -> f64 {
        i as f64 / (self.resolution - 1) as f64
    }

    pub fn get(&self, r: usize, g: usize, b: usize) -> [f64; 3] {
        self.table[self.index(r, g, b)]
    }
}

/// Writes a 3D LUT as a .cube file.
///
/// `comments` are written first, one `#`-prefixed line each.
pub fn write_cube_3d<W: Write>(
    out: &mut W,
    title: &str,
    comments: &[String],
    lut: &Lut3D,
) -> std::io::Result<()> {
    assert!(lut.table.len() == lut.resolution * lut.resolution * lut.resolution);

    for line in comments {
        if line.is_empty() {
            out.write_all(b"#\n")?;
        } else {
            out.write_all(format!("# {}\n", line).as_bytes())?;
        }
    }
    if !comments.is_empty() {
        out.write_all(b"\n")?;
    }

    out.write_all(format!("TITLE \"{}\"\n", title.replace('"', "'")).as_bytes())?;
    out.write_all(b"DOMAIN_MIN 0.0 0.0 0.0\n")?;
    out.write_all(b"DOMAIN_MAX 1.0 1.0 1.0\n")?;
    out.write_all(format!("LUT_3D_SIZE {}\n", lut.resolution).as_bytes())?;

    for [r, g, b] in lut.table.iter().copied() {
        out.write_all(format!("{:0.7} {:0.7} {:0.7}\n", r, g, b).as_bytes())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_and_coords() {
        let lut = Lut3D {
            resolution: 3,
            table: vec![[0.0; 3]; 27],
        };
        assert_eq!(lut.index(1, 0, 0), 1);
        assert_eq!(lut.index(0, 1, 0), 3);
        assert_eq!(lut.index(0, 0, 1), 9);
        for i in 0..27 {
            let [r, g, b] = lut.coords(i);
            assert_eq!(lut.index(r, g, b), i);
        }
        assert_eq!(lut.input_value(0), 0.0);
        assert_eq!(lut.input_value(1), 0.5);
        assert_eq!(lut.input_value(2), 1.0);
    }

    #[test]
    fn cube_layout() {
        let mut table = Vec::new();
        for b in 0..2 {
            for g in 0..2 {
                for r in 0..2 {
                    table.push([r as f64, g as f64, b as f64]);
                }
            }
        }
        let lut = Lut3D {
            resolution: 2,
            table,
        };

        let mut out = Vec::new();
        write_cube_3d(&mut out, "Test", &["hello".into(), "".into()], &lut).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "# hello");
        assert_eq!(lines[1], "#");
        assert!(lines.contains(&"LUT_3D_SIZE 2"));
        assert!(lines.contains(&"TITLE \"Test\""));

        let data: Vec<&str> = lines
            .iter()
            .copied()
            .filter(|l| l.starts_with(|c: char| c.is_ascii_digit()))
            .collect();
        assert_eq!(data.len(), 8);
        assert_eq!(data[0], "0.0000000 0.0000000 0.0000000");
        assert_eq!(data[1], "1.0000000 0.0000000 0.0000000");
        assert_eq!(data[2], "0.0000000 1.0000000 0.0000000");
        assert_eq!(data[7], "1.0000000 1.0000000 1.0000000");
    }
}
