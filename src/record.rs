/// Positional layout of a well-formed record.
pub const COLUMNS: [&str; 8] = [
    "brand",
    "origin",
    "name",
    "unit_price_eur",
    "box_price_eur",
    "cig_per_box",
    "diameter_cm",
    "length_cm",
];

/// An 8-field record, still as scraped text.
///
/// The last three fields are the first three numeric tokens of the content
/// block, taken to be box count, diameter and length in that order. Nothing
/// on the page labels them; a record only gets here when the field count
/// works out.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub brand: String,
    pub origin: String,
    pub name: String,
    pub unit_price: String,
    pub box_price: String,
    pub cig_per_box: String,
    pub diameter: String,
    pub length: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Assembled {
    Conforming(ProductRecord),
    Malformed { fields: Vec<String>, arity: usize },
}

pub fn assemble(fields: Vec<String>) -> Assembled {
    let arity = fields.len();
    match <[String; 8]>::try_from(fields) {
        Ok([brand, origin, name, unit_price, box_price, cig_per_box, diameter, length]) => {
            Assembled::Conforming(ProductRecord {
                brand,
                origin,
                name,
                unit_price,
                box_price,
                cig_per_box,
                diameter,
                length,
            })
        }
        Err(fields) => Assembled::Malformed { fields, arity },
    }
}
