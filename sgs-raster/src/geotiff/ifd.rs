use super::geokeys;
use sgs_common::utils::{ByteOrderReader, Endianness};
use std::fmt;
use std::io::Cursor;

#[derive(Default, Clone, Debug)]
pub struct Ifd {
    pub tag: u16,
    pub ifd_type: u16,
    pub num_values: u64,
    pub offset: u64,
    pub data: Vec<u8>,
    byte_order: Endianness,
}

impl Ifd {
    pub fn new(
        tag: u16,
        ifd_type: u16,
        num_values: u64,
        offset: u64,
        data: Vec<u8>,
        byte_order: Endianness,
    ) -> Ifd {
        Ifd {
            tag,
            ifd_type,
            num_values,
            offset,
            data,
            byte_order,
        }
    }

    pub fn interpret_as_u16(&self) -> Vec<u16> {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        let mut vals: Vec<u16> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_u16().unwrap());
        }
        vals
    }

    pub fn interpret_as_u32(&self) -> Vec<u32> {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        let mut vals: Vec<u32> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_u32().unwrap());
        }
        vals
    }

    pub fn interpret_as_u64(&self) -> Vec<u64> {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        let mut vals: Vec<u64> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_u64().unwrap());
        }
        vals
    }

    pub fn interpret_as_i64(&self) -> Vec<i64> {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        let mut vals: Vec<i64> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_i64().unwrap());
        }
        vals
    }

    pub fn interpret_as_f64(&self) -> Vec<f64> {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        let mut vals: Vec<f64> = vec![];
        for _ in 0..self.num_values {
            vals.push(bor.read_f64().unwrap());
        }
        vals
    }

    pub fn interpret_as_ascii(&self) -> String {
        let num_trailing_zeros = self.data.iter().rev().take_while(|d| **d == 0u8).count();
        let s = &self.data[0..(self.data.len() - num_trailing_zeros)];
        let ret = match String::from_utf8(s.to_vec()) {
            Ok(v) => v,
            Err(e) => panic!(
                "Error converting TAG({}) to ASCII (value={:?}) {}",
                self.tag,
                self.data.clone(),
                e
            ),
        };
        ret.trim().to_owned()
    }

    pub fn interpret_data(&self) -> String {
        // sanity check: don't print out thousands of values in a tag.
        let how_many_vals = if self.num_values < 100 { self.num_values } else { 100u64 };
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(self.data.clone()), self.byte_order);
        if self.ifd_type == 2 {
            return String::from_utf8(self.data.clone()).unwrap_or_default();
        } else if self.ifd_type == 3 {
            let mut vals: Vec<u16> = vec![];
            for _ in 0..how_many_vals {
                vals.push(bor.read_u16().unwrap());
            }
            if self.num_values == 1 {
                let kw_map = geokeys::get_keyword_map();
                let map = match kw_map.get(&self.tag) {
                    Some(map) => map,
                    None => return format!("{:?}", vals),
                };
                return match map.get(&vals[0]) {
                    Some(v) => format!("{:?} ({})", v, vals[0]),
                    None => format!("{:?}", vals),
                };
            }
            format!("{:?}", vals)
        } else if self.ifd_type == 4 {
            let mut vals: Vec<u32> = vec![];
            for _ in 0..how_many_vals {
                vals.push(bor.read_u32().unwrap());
            }
            format!("{:?}", vals)
        } else if self.ifd_type == 12 {
            let mut vals: Vec<f64> = vec![];
            for _ in 0..how_many_vals {
                vals.push(bor.read_f64().unwrap());
            }
            format!("{:?}", vals)
        } else if self.ifd_type == 16 || self.ifd_type == 18 {
            let mut vals: Vec<u64> = vec![];
            for _ in 0..how_many_vals {
                vals.push(bor.read_u64().unwrap());
            }
            format!("{:?}", vals)
        } else if self.ifd_type == 17 {
            let mut vals: Vec<i64> = vec![];
            for _ in 0..how_many_vals {
                vals.push(bor.read_i64().unwrap());
            }
            format!("{:?}", vals)
        } else {
            format!("{:?}", self.data)
        }
    }
}

impl fmt::Display for Ifd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag_map = geokeys::get_keys_map();
        let ft_map = geokeys::get_field_type_map();

        if let Some(entry) = tag_map.get(&self.tag) {
            let off = if self.num_values > 1 || self.ifd_type > 3 {
                format!(" offset={}", self.offset)
            } else {
                String::new()
            };

            let mut d = if self.ifd_type != 2 {
                self.interpret_data()
            } else {
                self.interpret_data().replace('\0', "")
            };

            let c = if self.num_values > 1 {
                format!(" count={}", self.num_values)
            } else {
                d = d.replace('[', "").replace(']', "");
                String::new()
            };

            return write!(
                f,
                "{} (code={} type={}{}{}): {}",
                entry.name, entry.code, ft_map[&self.ifd_type], c, off, d
            );
        }

        let mut s = format!("\nUnrecognized Tag ({})", &self.tag);
        s = s + &format!("\nIFD_type: {} ({})", ft_map[&self.ifd_type], self.ifd_type);
        s = s + &format!("\nNum_values: {}", self.num_values);
        if self.num_values > 1 || self.ifd_type > 3 {
            s = s + &format!("\nOffset: {}", self.offset);
        }
        if self.ifd_type != 2 {
            s = s + &format!("\nData: {}", self.interpret_data());
        } else {
            s = s + &format!("\nData: {}", self.interpret_data().replace('\0', ""));
        }
        write!(f, "{}", s)
    }
}

#[derive(Default, Clone, Debug)]
pub(super) struct IfdEntry {
    pub tag: u16,
    pub ifd_type: u16,
    pub num_values: u32,
    pub offset: u32,
}

impl IfdEntry {
    pub(super) fn new(tag: u16, ifd_type: u16, num_values: u32, offset: u32) -> IfdEntry {
        IfdEntry { tag, ifd_type, num_values, offset }
    }
}

impl fmt::Display for IfdEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag_map = geokeys::get_keys_map();
        let ft_map = geokeys::get_field_type_map();

        let mut s = format!("\nTag {} {:?}", &self.tag, tag_map.get(&self.tag));
        s = s + &format!("\nIFD_type: {} ({})", ft_map[&self.ifd_type], self.ifd_type);
        s = s + &format!("\nNum_values: {}", self.num_values);
        s = s + &format!("\nOffset: {}", self.offset);
        write!(f, "{}", s)
    }
}

#[derive(Default, Clone, Debug)]
pub(super) struct Entry {
    pub tag: u16,
    pub ifd_type: u16,
    pub num_values: u64,
    pub offset: u64,
}

impl Entry {
    pub(super) fn new(tag: u16, ifd_type: u16, num_values: u64, offset: u64) -> Entry {
        Entry { tag, ifd_type, num_values, offset }
    }
}

impl fmt::Display for Entry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let tag_map = geokeys::get_keys_map();
        let ft_map = geokeys::get_field_type_map();

        let mut s = format!("\nTag {} {:?}", &self.tag, tag_map.get(&self.tag));
        s = s + &format!("\nIFD_type: {} ({})", ft_map[&self.ifd_type], self.ifd_type);
        s = s + &format!("\nNum_values: {}", self.num_values);
        s = s + &format!("\nOffset: {}", self.offset);
        write!(f, "{}", s)
    }
}
