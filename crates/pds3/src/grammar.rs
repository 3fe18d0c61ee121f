/// The "typed grammar" selector used by `PdsParserFactory`'s equivalent in
/// this crate: which kind of PDS3 catalog file is being parsed.
///
/// Grounded on `PdsParserFactory.FileGrammary` in
/// `examples/original_source/pds_crawler/load/pds_objects.py`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrammarKind {
    /// `mission.cat`.
    Mission,
    /// `host.cat` (instrument host / platform).
    InstrumentHost,
    /// `instrument.cat` / `inst.cat`.
    Instrument,
    /// Dataset catalog (the file named by `DATA_SET_CATALOG`).
    DataSet,
    /// Map projection catalog.
    DataSetMapProjection,
    /// `person.cat` / `personnel.cat`.
    Personnel,
    /// `reference.cat`.
    Reference,
    /// `voldesc.cat`.
    VolumeDescription,
}

impl GrammarKind {
    /// Maps a catalog-type key (as produced by
    /// `pdsstac_models::pds3::CatalogDescriptor::entries`) to its grammar
    /// kind, if recognized.
    pub fn from_catalog_type(catalog_type: &str) -> Option<GrammarKind> {
        match catalog_type {
            "mission" => Some(GrammarKind::Mission),
            "instrument_host" => Some(GrammarKind::InstrumentHost),
            "instrument" => Some(GrammarKind::Instrument),
            "dataset" => Some(GrammarKind::DataSet),
            "projection" => Some(GrammarKind::DataSetMapProjection),
            "personnel" => Some(GrammarKind::Personnel),
            "reference" => Some(GrammarKind::Reference),
            _ => None,
        }
    }
}
