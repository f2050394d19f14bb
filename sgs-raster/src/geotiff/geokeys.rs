use super::ifd::Ifd;
use super::tiff_consts::*;
use sgs_common::utils::{ByteOrderReader, Endianness};
use std::collections::HashMap;
use std::io::Cursor;

#[derive(Default, Clone, Copy, Debug)]
pub struct GeoKeyEntry {
    pub tag: u16,
    pub location: u16,
    pub count: u16,
    pub value_offset: u16,
}

/// Accumulates the GeoKeyDirectoryTag / GeoDoubleParamsTag / GeoAsciiParamsTag
/// triple into a single queryable structure, the way the GeoTIFF spec's
/// "GeoKey" indirection is meant to be read.
#[derive(Default, Clone, Debug)]
pub struct GeoKeys {
    entries: Vec<GeoKeyEntry>,
    double_params: Vec<f64>,
    ascii_params: String,
}

impl GeoKeys {
    pub fn add_key_directory(&mut self, data: &[u8], byte_order: Endianness) {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(data.to_vec()), byte_order);
        let _key_directory_version = bor.read_u16().unwrap_or(1);
        let _key_revision = bor.read_u16().unwrap_or(1);
        let _minor_revision = bor.read_u16().unwrap_or(0);
        let num_keys = bor.read_u16().unwrap_or(0);
        for _ in 0..num_keys {
            let tag = match bor.read_u16() {
                Ok(v) => v,
                Err(_) => break,
            };
            let location = bor.read_u16().unwrap_or(0);
            let count = bor.read_u16().unwrap_or(0);
            let value_offset = bor.read_u16().unwrap_or(0);
            self.entries.push(GeoKeyEntry { tag, location, count, value_offset });
        }
    }

    pub fn add_double_params(&mut self, data: &[u8], byte_order: Endianness) {
        let mut bor =
            ByteOrderReader::<Cursor<Vec<u8>>>::new(Cursor::new(data.to_vec()), byte_order);
        let n = data.len() / 8;
        for _ in 0..n {
            match bor.read_f64() {
                Ok(v) => self.double_params.push(v),
                Err(_) => break,
            }
        }
    }

    pub fn add_ascii_params(&mut self, data: &[u8]) {
        self.ascii_params = String::from_utf8_lossy(data)
            .trim_matches(|c| c == '\0')
            .to_string();
    }

    /// Returns the EPSG code carried by GeographicTypeGeoKey (2048) or
    /// ProjectedCSTypeGeoKey (3072), preferring the projected code. Values of
    /// 32767 (user-defined) or 0 (undefined) are treated as "no code".
    pub fn find_epsg_code(&self) -> u16 {
        let mut geographic = 0u16;
        for e in &self.entries {
            if e.location != 0 {
                continue;
            }
            if e.tag == TAG_PROJECTEDCSTYPEGEOKEY && e.value_offset != 0 && e.value_offset != 32767
            {
                return e.value_offset;
            }
            if e.tag == TAG_GEOGRAPHICTYPEGEOKEY && e.value_offset != 0 && e.value_offset != 32767
            {
                geographic = e.value_offset;
            }
        }
        geographic
    }

    /// Re-expresses every geokey as an `Ifd`, the same shape used for the
    /// baseline TIFF tags, so that callers can interpret geokeys with the
    /// same `interpret_as_*` helpers.
    pub fn get_ifd_map(&self, byte_order: Endianness) -> HashMap<u16, Ifd> {
        let mut map = HashMap::new();
        for e in &self.entries {
            let ifd = match e.location {
                0 => {
                    let data = e.value_offset.to_le_bytes().to_vec();
                    Ifd::new(e.tag, DT_SHORT, 1, e.value_offset as u64, data, Endianness::LittleEndian)
                }
                TAG_GEODOUBLEPARAMSTAG => {
                    let start = e.value_offset as usize;
                    let end = (start + e.count as usize).min(self.double_params.len());
                    let mut data = vec![];
                    for v in &self.double_params[start.min(end)..end] {
                        data.extend_from_slice(&v.to_le_bytes());
                    }
                    Ifd::new(e.tag, DT_DOUBLE, e.count as u64, e.value_offset as u64, data, Endianness::LittleEndian)
                }
                TAG_GEOASCIIPARAMSTAG => {
                    let start = e.value_offset as usize;
                    let end = (start + e.count as usize).min(self.ascii_params.len());
                    let data = self
                        .ascii_params
                        .as_bytes()
                        .get(start.min(end)..end)
                        .unwrap_or(&[])
                        .to_vec();
                    Ifd::new(e.tag, DT_ASCII, e.count as u64, e.value_offset as u64, data, byte_order)
                }
                _ => continue,
            };
            map.insert(e.tag, ifd);
        }
        map
    }

    pub fn interpret_geokeys(&self) -> String {
        let tag_map = get_keys_map();
        let mut s = format!("GeoKeys ({} entries):", self.entries.len());
        for e in &self.entries {
            let name = tag_map
                .get(&e.tag)
                .map(|entry| entry.name.clone())
                .unwrap_or_else(|| format!("Unknown ({})", e.tag));
            s = s + &format!(
                "\n  {}: location={} count={} value_offset={}",
                name, e.location, e.count, e.value_offset
            );
        }
        if !self.double_params.is_empty() {
            s = s + &format!("\nDoubleParams: {:?}", self.double_params);
        }
        if !self.ascii_params.is_empty() {
            s = s + &format!("\nAsciiParams: {}", self.ascii_params);
        }
        s
    }
}

#[derive(Clone, Debug)]
pub(super) struct TagEntry {
    pub name: String,
    pub code: u16,
}

/// Baseline TIFF and GeoTIFF tag numbers, keyed by tag id, for diagnostics.
pub(super) fn get_keys_map() -> HashMap<u16, TagEntry> {
    let pairs: Vec<(u16, &str)> = vec![
        (TAG_NEWSUBFILETYPE, "NewSubfileType"),
        (TAG_IMAGEWIDTH, "ImageWidth"),
        (TAG_IMAGELENGTH, "ImageLength"),
        (TAG_BITSPERSAMPLE, "BitsPerSample"),
        (TAG_COMPRESSION, "Compression"),
        (TAG_PHOTOMETRICINTERPRETATION, "PhotometricInterpretation"),
        (TAG_FILLORDER, "FillOrder"),
        (TAG_DOCUMENTNAME, "DocumentName"),
        (TAG_PLANARCONFIGURATION, "PlanarConfiguration"),
        (TAG_STRIPOFFSETS, "StripOffsets"),
        (TAG_ORIENTATION, "Orientation"),
        (TAG_SAMPLESPERPIXEL, "SamplesPerPixel"),
        (TAG_ROWSPERSTRIP, "RowsPerStrip"),
        (TAG_STRIPBYTECOUNTS, "StripByteCounts"),
        (TAG_TILEWIDTH, "TileWidth"),
        (TAG_TILELENGTH, "TileLength"),
        (TAG_TILEOFFSETS, "TileOffsets"),
        (TAG_TILEBYTECOUNTS, "TileByteCounts"),
        (TAG_XRESOLUTION, "XResolution"),
        (TAG_YRESOLUTION, "YResolution"),
        (TAG_RESOLUTIONUNIT, "ResolutionUnit"),
        (TAG_SOFTWARE, "Software"),
        (TAG_PREDICTOR, "Predictor"),
        (TAG_COLORMAP, "ColorMap"),
        (TAG_EXTRASAMPLES, "ExtraSamples"),
        (TAG_SAMPLEFORMAT, "SampleFormat"),
        (TAG_GDAL_METADATA, "GDAL_METADATA"),
        (TAG_GDAL_NODATA, "GDAL_NODATA"),
        (TAG_MODELPIXELSCALETAG, "ModelPixelScaleTag"),
        (TAG_MODELTRANSFORMATIONTAG, "ModelTransformationTag"),
        (TAG_MODELTIEPOINTTAG, "ModelTiepointTag"),
        (TAG_GEOKEYDIRECTORYTAG, "GeoKeyDirectoryTag"),
        (TAG_GEODOUBLEPARAMSTAG, "GeoDoubleParamsTag"),
        (TAG_GEOASCIIPARAMSTAG, "GeoAsciiParamsTag"),
        (TAG_INTERGRAPHMATRIXTAG, "IntergraphMatrixTag"),
        (TAG_GTMODELTYPEGEOKEY, "GTModelTypeGeoKey"),
        (TAG_GTRASTERTYPEGEOKEY, "GTRasterTypeGeoKey"),
        (TAG_GTCITATIONGEOKEY, "GTCitationGeoKey"),
        (TAG_GEOGRAPHICTYPEGEOKEY, "GeographicTypeGeoKey"),
        (TAG_GEOGCITATIONGEOKEY, "GeogCitationGeoKey"),
        (TAG_GEOGGEODETICDATUMGEOKEY, "GeogGeodeticDatumGeoKey"),
        (TAG_GEOGPRIMEMERIDIANGEOKEY, "GeogPrimeMeridianGeoKey"),
        (TAG_GEOGLINEARUNITSGEOKEY, "GeogLinearUnitsGeoKey"),
        (TAG_GEOGLINEARUNITSIZEGEOKEY, "GeogLinearUnitSizeGeoKey"),
        (TAG_GEOGANGULARUNITSGEOKEY, "GeogAngularUnitsGeoKey"),
        (TAG_GEOGANGULARUNITSIZEGEOKEY, "GeogAngularUnitSizeGeoKey"),
        (TAG_GEOGELLIPSOIDGEOKEY, "GeogEllipsoidGeoKey"),
        (TAG_GEOGSEMIMAJORAXISGEOKEY, "GeogSemiMajorAxisGeoKey"),
        (TAG_GEOGSEMIMINORAXISGEOKEY, "GeogSemiMinorAxisGeoKey"),
        (TAG_GEOGINVFLATTENINGGEOKEY, "GeogInvFlatteningGeoKey"),
        (TAG_GEOGAZIMUTHUNITSGEOKEY, "GeogAzimuthUnitsGeoKey"),
        (TAG_GEOGPRIMEMERIDIANLONGGEOKEY, "GeogPrimeMeridianLongGeoKey"),
        (TAG_PROJECTEDCSTYPEGEOKEY, "ProjectedCSTypeGeoKey"),
        (TAG_PCSCITATIONGEOKEY, "PCSCitationGeoKey"),
        (TAG_PROJECTIONGEOKEY, "ProjectionGeoKey"),
        (TAG_PROJCOORDTRANSGEOKEY, "ProjCoordTransGeoKey"),
        (TAG_PROJLINEARUNITSGEOKEY, "ProjLinearUnitsGeoKey"),
        (TAG_PROJLINEARUNITSIZEGEOKEY, "ProjLinearUnitSizeGeoKey"),
        (TAG_PROJSTDPARALLEL1GEOKEY, "ProjStdParallel1GeoKey"),
        (TAG_PROJSTDPARALLEL2GEOKEY, "ProjStdParallel2GeoKey"),
        (TAG_PROJNATORIGINLONGGEOKEY, "ProjNatOriginLongGeoKey"),
        (TAG_PROJNATORIGINLATGEOKEY, "ProjNatOriginLatGeoKey"),
        (TAG_PROJFALSEEASTINGGEOKEY, "ProjFalseEastingGeoKey"),
        (TAG_PROJFALSENORTHINGGEOKEY, "ProjFalseNorthingGeoKey"),
        (TAG_PROJFALSEORIGINLONGGEOKEY, "ProjFalseOriginLongGeoKey"),
        (TAG_PROJFALSEORIGINLATGEOKEY, "ProjFalseOriginLatGeoKey"),
        (TAG_PROJFALSEORIGINEASTINGGEOKEY, "ProjFalseOriginEastingGeoKey"),
        (TAG_PROJFALSEORIGINNORTHINGGEOKEY, "ProjFalseOriginNorthingGeoKey"),
        (TAG_PROJCENTERLONGGEOKEY, "ProjCenterLongGeoKey"),
        (TAG_PROJCENTERLATGEOKEY, "ProjCenterLatGeoKey"),
        (TAG_PROJCENTEREASTINGGEOKEY, "ProjCenterEastingGeoKey"),
        (TAG_PROJCENTERNORTHINGGEOKEY, "ProjCenterNorthingGeoKey"),
        (TAG_PROJSCALEATNATORIGINGEOKEY, "ProjScaleAtNatOriginGeoKey"),
        (TAG_PROJSCALEATCENTERGEOKEY, "ProjScaleAtCenterGeoKey"),
        (TAG_PROJAZIMUTHANGLEGEOKEY, "ProjAzimuthAngleGeoKey"),
        (TAG_PROJSTRAIGHTVERTPOLELONGGEOKEY, "ProjStraightVertPoleLongGeoKey"),
        (TAG_VERTICALCSTYPEGEOKEY, "VerticalCSTypeGeoKey"),
        (TAG_VERTICALCITATIONGEOKEY, "VerticalCitationGeoKey"),
        (TAG_VERTICALDATUMGEOKEY, "VerticalDatumGeoKey"),
        (TAG_VERTICALUNITSGEOKEY, "VerticalUnitsGeoKey"),
        (TAG_PHOTOSHOP, "Photoshop"),
    ];
    pairs
        .into_iter()
        .map(|(code, name)| (code, TagEntry { name: name.to_string(), code }))
        .collect()
}

/// Maps IFD field-type codes (TIFF6 §2, extended by BigTIFF) to their names.
pub(super) fn get_field_type_map() -> HashMap<u16, String> {
    let pairs = [
        (DT_BYTE, "BYTE"),
        (DT_ASCII, "ASCII"),
        (DT_SHORT, "SHORT"),
        (DT_LONG, "LONG"),
        (DT_RATIONAL, "RATIONAL"),
        (DT_SBYTE, "SBYTE"),
        (DT_UNDEFINED, "UNDEFINED"),
        (DT_SSHORT, "SSHORT"),
        (DT_SLONG, "SLONG"),
        (DT_SRATIONAL, "SRATIONAL"),
        (DT_FLOAT, "FLOAT"),
        (DT_DOUBLE, "DOUBLE"),
        (DT_TIFF_LONG8, "LONG8"),
        (DT_TIFF_SLONG8, "SLONG8"),
        (DT_TIFF_IFD8, "IFD8"),
    ];
    pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
}

/// Value-name lookup tables for the tags whose values are enumerations — the
/// photometric interpretation (262) plus a representative subset of the
/// GeographicTypeGeoKey (2048) and ProjectedCSTypeGeoKey (3072) EPSG code
/// spaces, enough to label the common test and demo CRSes by name.
pub fn get_keyword_map() -> HashMap<u16, HashMap<u16, String>> {
    let mut map = HashMap::new();

    let mut photometric = HashMap::new();
    photometric.insert(PI_WHITEISZERO, "WhiteIsZero".to_string());
    photometric.insert(PI_BLACKISZERO, "BlackIsZero".to_string());
    photometric.insert(PI_RGB, "RGB".to_string());
    photometric.insert(PI_PALETTED, "Paletted".to_string());
    map.insert(TAG_PHOTOMETRICINTERPRETATION, photometric);

    let mut geographic = HashMap::new();
    geographic.insert(4326u16, "WGS_1984".to_string());
    geographic.insert(4267u16, "North_American_Datum_1927".to_string());
    geographic.insert(4269u16, "North_American_Datum_1983".to_string());
    geographic.insert(4322u16, "WGS_1972".to_string());
    map.insert(TAG_GEOGRAPHICTYPEGEOKEY, geographic);

    let mut projected = HashMap::new();
    for zone in 1..=60u16 {
        projected.insert(32600 + zone, format!("WGS_1984_UTM_Zone_{}N", zone));
        projected.insert(32700 + zone, format!("WGS_1984_UTM_Zone_{}S", zone));
    }
    projected.insert(3857u16, "WGS_1984_Web_Mercator_Auxiliary_Sphere".to_string());
    projected.insert(3395u16, "WGS_1984_World_Mercator".to_string());
    map.insert(TAG_PROJECTEDCSTYPEGEOKEY, projected);

    map
}
