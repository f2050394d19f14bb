//! Minimal EPSG-to-ESRI-WKT lookup used when writing CRS metadata into
//! GeoTIFF tags. Covers WGS84/NAD27/NAD83 geographic CRSes and the UTM and
//! Web Mercator projected CRSes most commonly seen in test fixtures; unknown
//! codes fall back to the same `"not specified"` sentinel the raster configs
//! default to.

/// Returns the ESRI-flavoured WKT string for a geographic or projected EPSG
/// code. `0` and unrecognized codes return `"not specified"`.
pub fn esri_wkt_from_epsg(epsg_code: u16) -> String {
    match epsg_code {
        4326 => geogcs_wgs84(),
        4267 => geogcs(
            "NAD27",
            "North_American_Datum_1927",
            "Clarke_1866",
            6378206.4,
            294.978698213898,
        ),
        4269 => geogcs(
            "NAD83",
            "North_American_Datum_1983",
            "GRS_1980",
            6378137.0,
            298.257222101,
        ),
        4322 => geogcs(
            "WGS 72",
            "WGS_1972",
            "WGS_1972",
            6378135.0,
            298.26,
        ),
        3857 => format!(
            "PROJCS[\"WGS_1984_Web_Mercator_Auxiliary_Sphere\",{},PROJECTION[\"Mercator_Auxiliary_Sphere\"],UNIT[\"Meter\",1.0]]",
            geogcs_wgs84()
        ),
        3395 => format!(
            "PROJCS[\"WGS_1984_World_Mercator\",{},PROJECTION[\"Mercator\"],UNIT[\"Meter\",1.0]]",
            geogcs_wgs84()
        ),
        32601..=32660 => utm_wkt(epsg_code - 32600, true),
        32701..=32760 => utm_wkt(epsg_code - 32700, false),
        _ => "not specified".to_string(),
    }
}

fn geogcs_wgs84() -> String {
    geogcs("WGS 84", "WGS_1984", "WGS_1984", 6378137.0, 298.257223563)
}

fn geogcs(
    name: &str,
    datum_name: &str,
    spheroid_name: &str,
    semi_major_axis: f64,
    inverse_flattening: f64,
) -> String {
    format!(
        "GEOGCS[\"{}\",DATUM[\"{}\",SPHEROID[\"{}\",{},{}]],PRIMEM[\"Greenwich\",0],UNIT[\"Degree\",0.0174532925199433]]",
        name, datum_name, spheroid_name, semi_major_axis, inverse_flattening
    )
}

fn utm_wkt(zone: u16, northern: bool) -> String {
    let hemisphere = if northern { "N" } else { "S" };
    let false_northing = if northern { 0.0 } else { 10000000.0 };
    format!(
        "PROJCS[\"WGS_1984_UTM_Zone_{}{}\",{},PROJECTION[\"Transverse_Mercator\"],PARAMETER[\"False_Easting\",500000.0],PARAMETER[\"False_Northing\",{}],PARAMETER[\"Central_Meridian\",{}],PARAMETER[\"Scale_Factor\",0.9996],PARAMETER[\"Latitude_Of_Origin\",0.0],UNIT[\"Meter\",1.0]]",
        zone,
        hemisphere,
        geogcs_wgs84(),
        false_northing,
        -183.0 + 6.0 * zone as f64
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wgs84_round_trips_a_geogcs() {
        let wkt = esri_wkt_from_epsg(4326);
        assert!(wkt.starts_with("GEOGCS["));
        assert!(wkt.contains("WGS_1984"));
    }

    #[test]
    fn utm_zone_is_a_transverse_mercator_projcs() {
        let wkt = esri_wkt_from_epsg(32611);
        assert!(wkt.contains("PROJCS["));
        assert!(wkt.contains("UTM_Zone_11N"));
        assert!(wkt.contains("Central_Meridian\",-117"));
    }

    #[test]
    fn unknown_code_is_not_specified() {
        assert_eq!(esri_wkt_from_epsg(0), "not specified");
        assert_eq!(esri_wkt_from_epsg(9999), "not specified");
    }
}
