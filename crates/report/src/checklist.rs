//! Physical-mechanical inspection checklist

use inspection::{format_inspection_flag, FieldValue, InspectionRecord};

/// Number of items per checklist row
pub const CHECKLIST_COLUMNS: usize = 3;

/// One checklist entry
#[derive(Clone, Copy)]
pub struct ChecklistItem {
    /// Label printed on the form
    pub label: &'static str,
    /// Backend field name
    pub key: &'static str,
    value: fn(&InspectionRecord) -> Option<&FieldValue>,
}

impl ChecklistItem {
    /// Raw value of this item in a record
    pub fn value<'r>(&self, record: &'r InspectionRecord) -> Option<&'r FieldValue> {
        (self.value)(record)
    }

    /// Printed value of this item in a record
    pub fn format(&self, record: &InspectionRecord) -> &'static str {
        format_inspection_flag(self.value(record))
    }
}

impl std::fmt::Debug for ChecklistItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChecklistItem")
            .field("label", &self.label)
            .field("key", &self.key)
            .finish()
    }
}

macro_rules! item {
    ($label:literal, $key:literal, $field:ident) => {
        ChecklistItem {
            label: $label,
            key: $key,
            value: |record| record.$field.as_ref(),
        }
    };
}

/// The checklist, row-major, in the order it is printed
pub static CHECKLIST: [ChecklistItem; 24] = [
    item!("Pintura y Carrocería", "PinturaCarroceriaVer", pintura_carroceria_ver),
    item!("Claxon", "ClaxonVer", claxon_ver),
    item!("Extintor", "EstinguidorVer", estinguidor_ver),
    item!("Estado de Llantas", "EstadoLlantasVer", estado_llantas_ver),
    item!("Luz Baja", "LuzBajaVer", luz_baja_ver),
    item!("Herramienta", "HerramientaVer", herramienta_ver),
    item!("Defensas", "DefensasVer", defensas_ver),
    item!("Luz Alta", "LuzAltaVer", luz_alta_ver),
    item!("Sistema de Frenado", "SistemaFrenadoVer", sistema_frenado_ver),
    item!("Vidrios", "VidriosVer", vidrios_ver),
    item!("Cuartos", "CuartosVer", cuartos_ver),
    item!("Sistema de Dirección", "SistemaDireccionVer", sistema_direccion_ver),
    item!("Limpiadores", "LimpiadoresVer", limpiadores_ver),
    item!("Direccionales", "DireccionalesVer", direccionales_ver),
    item!("Sistema de Suspensión", "SistemaSuspensionVer", sistema_suspension_ver),
    item!("Espejos", "EspejosVer", espejos_ver),
    item!("Intermitentes", "IntermitentesVer", intermitentes_ver),
    item!("Interiores", "InterioresVer", interiores_ver),
    item!("Llanta de Refacción", "LlantaRefaccionVer", llanta_refaccion_ver),
    item!("Stop", "StopVer", stop_ver),
    item!("Botiquín", "BotiquinVer", botiquin_ver),
    item!("Parabrisas Medallón", "ParabrisasMedallonVer", parabrisas_medallon_ver),
    item!("Timbre", "TimbreVer", timbre_ver),
    item!("Cinturón de Seguridad", "CinturonSeguridadVer", cinturon_seguridad_ver),
];

/// Checklist rows, three items each
pub fn checklist_rows() -> impl Iterator<Item = &'static [ChecklistItem]> {
    CHECKLIST.chunks(CHECKLIST_COLUMNS)
}

/// (label, printed value) pairs of a record, in printed order
pub fn checklist_entries(record: &InspectionRecord) -> Vec<(&'static str, &'static str)> {
    CHECKLIST
        .iter()
        .map(|item| (item.label, item.format(record)))
        .collect()
}
