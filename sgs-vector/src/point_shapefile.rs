//! A minimal ESRI Shapefile (.shp/.shx/.dbf/.prj) writer for Point geometries only.
//!
//! Grounded in the byte layout of the teacher's (incomplete, see DESIGN.md) shapefile
//! module: big-endian file header with a leading `9994` magic number and
//! little-endian shape type / extent / record payloads, record numbers 1-based. The
//! `.dbf`/`.shx` companion files follow the standard xBase / shapefile-index layouts,
//! which the teacher's retrieved fragment did not reach before being truncated.

use byteorder::{BigEndian, LittleEndian, WriteBytesExt};
use log::warn;
use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::Path;

const SHAPE_TYPE_POINT: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldType {
    Int,
    Real,
    Text,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub width: u8,
    pub decimals: u8,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType, width: u8, decimals: u8) -> FieldSpec {
        FieldSpec { name: name.into(), field_type, width, decimals }
    }
}

#[derive(Debug, Clone)]
pub enum AttrValue {
    Int(i64),
    Real(f64),
    Text(String),
}

/// Point-only shapefile writer. One record per sample point, in insertion order.
pub struct PointShapefileWriter {
    base_path: std::path::PathBuf,
    crs_wkt: String,
    fields: Vec<FieldSpec>,
    records: Vec<(f64, f64, Vec<AttrValue>)>,
}

impl PointShapefileWriter {
    pub fn new(path: impl AsRef<Path>, crs_wkt: impl Into<String>) -> PointShapefileWriter {
        PointShapefileWriter {
            base_path: path.as_ref().with_extension(""),
            crs_wkt: crs_wkt.into(),
            fields: Vec::new(),
            records: Vec::new(),
        }
    }

    pub fn add_field(&mut self, field: FieldSpec) {
        self.fields.push(field);
    }

    pub fn add_point(&mut self, x: f64, y: f64, attrs: Vec<AttrValue>) {
        debug_assert_eq!(attrs.len(), self.fields.len());
        self.records.push((x, y, attrs));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn write(&self) -> Result<(), Error> {
        self.write_shp_shx()?;
        self.write_dbf()?;
        self.write_prj()?;
        Ok(())
    }

    fn extent(&self) -> (f64, f64, f64, f64) {
        let mut xmin = f64::INFINITY;
        let mut ymin = f64::INFINITY;
        let mut xmax = f64::NEG_INFINITY;
        let mut ymax = f64::NEG_INFINITY;
        for &(x, y, _) in &self.records {
            xmin = xmin.min(x);
            ymin = ymin.min(y);
            xmax = xmax.max(x);
            ymax = ymax.max(y);
        }
        if self.records.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (xmin, ymin, xmax, ymax)
        }
    }

    fn write_shp_shx(&self) -> Result<(), Error> {
        let record_content_words = 10; // shape type (4 bytes) + x + y (2*8 bytes) = 20 bytes = 10 words
        let record_bytes = 8 + record_content_words * 2; // header (8) + content
        let file_bytes = 100 + self.records.len() * record_bytes;
        let file_words = file_bytes / 2;

        let (xmin, ymin, xmax, ymax) = self.extent();

        let mut shp = BufWriter::new(File::create(self.base_path.with_extension("shp"))?);
        let mut shx = BufWriter::new(File::create(self.base_path.with_extension("shx"))?);

        write_common_header(&mut shp, file_words as i32, SHAPE_TYPE_POINT, xmin, ymin, xmax, ymax)?;
        let shx_words = (100 + self.records.len() * 8) / 2;
        write_common_header(&mut shx, shx_words as i32, SHAPE_TYPE_POINT, xmin, ymin, xmax, ymax)?;

        let mut offset_words = 50i32; // 100-byte header in 16-bit words
        for (i, &(x, y, _)) in self.records.iter().enumerate() {
            shp.write_i32::<BigEndian>(i as i32 + 1)?;
            shp.write_i32::<BigEndian>(record_content_words as i32)?;
            shp.write_i32::<LittleEndian>(SHAPE_TYPE_POINT)?;
            shp.write_f64::<LittleEndian>(x)?;
            shp.write_f64::<LittleEndian>(y)?;

            shx.write_i32::<BigEndian>(offset_words)?;
            shx.write_i32::<BigEndian>(record_content_words as i32)?;
            offset_words += 4 + record_content_words as i32;
        }
        shp.flush()?;
        shx.flush()?;
        Ok(())
    }

    fn write_dbf(&self) -> Result<(), Error> {
        let mut f = BufWriter::new(File::create(self.base_path.with_extension("dbf"))?);
        let num_records = self.records.len() as u32;
        let header_len = 32 + 32 * self.fields.len() as u16 + 1;
        let record_len: u16 = 1 + self.fields.iter().map(|f| f.width as u16).sum::<u16>();

        f.write_u8(0x03)?; // dBase III
        f.write_u8(94)?; // year (since 1900)
        f.write_u8(1)?;
        f.write_u8(1)?;
        f.write_u32::<LittleEndian>(num_records)?;
        f.write_u16::<LittleEndian>(header_len)?;
        f.write_u16::<LittleEndian>(record_len)?;
        f.write_all(&[0u8; 20])?; // reserved

        for field in &self.fields {
            let mut name_bytes = [0u8; 11];
            if field.name.len() > 10 {
                warn!(
                    "dbf field name '{}' exceeds the 10-character xBase limit; truncating",
                    field.name
                );
            }
            let name = if field.name.len() > 10 { &field.name[..10] } else { &field.name };
            name_bytes[..name.len()].copy_from_slice(name.as_bytes());
            f.write_all(&name_bytes)?;
            let type_char = match field.field_type {
                FieldType::Int => b'N',
                FieldType::Real => b'N',
                FieldType::Text => b'C',
            };
            f.write_u8(type_char)?;
            f.write_u32::<LittleEndian>(0)?; // field data address, unused
            f.write_u8(field.width)?;
            f.write_u8(field.decimals)?;
            f.write_all(&[0u8; 14])?; // reserved
        }
        f.write_u8(0x0D)?; // header terminator

        for (_, _, attrs) in &self.records {
            f.write_u8(b' ')?; // not deleted
            for (field, attr) in self.fields.iter().zip(attrs.iter()) {
                let text = match (field.field_type, attr) {
                    (FieldType::Int, AttrValue::Int(v)) => format!("{}", v),
                    (FieldType::Real, AttrValue::Real(v)) => format!("{:.*}", field.decimals as usize, v),
                    (FieldType::Text, AttrValue::Text(v)) => v.clone(),
                    (_, AttrValue::Int(v)) => format!("{}", v),
                    (_, AttrValue::Real(v)) => format!("{}", v),
                    (_, AttrValue::Text(v)) => v.clone(),
                };
                let width = field.width as usize;
                let padded = if text.len() >= width {
                    warn!(
                        "dbf value '{}' for field '{}' exceeds its {}-byte width; truncating",
                        text, field.name, width
                    );
                    text[..width].to_string()
                } else {
                    format!("{:>width$}", text, width = width)
                };
                f.write_all(padded.as_bytes())?;
            }
        }
        f.write_u8(0x1A)?; // EOF marker
        f.flush()
    }

    fn write_prj(&self) -> Result<(), Error> {
        std::fs::write(self.base_path.with_extension("prj"), &self.crs_wkt)
    }
}

fn write_common_header<W: Write>(
    w: &mut W,
    file_words: i32,
    shape_type: i32,
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
) -> Result<(), Error> {
    w.write_i32::<BigEndian>(9994)?;
    for _ in 0..5 {
        w.write_i32::<BigEndian>(0)?;
    }
    w.write_i32::<BigEndian>(file_words)?;
    w.write_i32::<LittleEndian>(1000)?;
    w.write_i32::<LittleEndian>(shape_type)?;
    w.write_f64::<LittleEndian>(xmin)?;
    w.write_f64::<LittleEndian>(ymin)?;
    w.write_f64::<LittleEndian>(xmax)?;
    w.write_f64::<LittleEndian>(ymax)?;
    w.write_f64::<LittleEndian>(0.0)?; // zmin
    w.write_f64::<LittleEndian>(0.0)?; // zmax
    w.write_f64::<LittleEndian>(0.0)?; // mmin
    w.write_f64::<LittleEndian>(0.0)?; // mmax
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extent_of_empty_writer_is_zero() {
        let w = PointShapefileWriter::new("/tmp/unused.shp", "EPSG:4326");
        assert_eq!(w.extent(), (0.0, 0.0, 0.0, 0.0));
    }

    #[test]
    fn extent_tracks_inserted_points() {
        let mut w = PointShapefileWriter::new("/tmp/unused.shp", "EPSG:4326");
        w.add_field(FieldSpec::new("FID", FieldType::Int, 10, 0));
        w.add_point(1.0, 2.0, vec![AttrValue::Int(0)]);
        w.add_point(-3.0, 5.0, vec![AttrValue::Int(1)]);
        assert_eq!(w.extent(), (-3.0, 2.0, 1.0, 5.0));
    }
}
