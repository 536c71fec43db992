//! Assembles the report prompt sent to the model.
//!
//! The report sections are requested in a fixed order and the hidden JSON
//! contracts embedded here are what `report::interpreter` later validates,
//! so the key names in both places must stay in lockstep.

use crate::report::ReportRequest;

#[derive(Debug, Clone)]
pub struct PromptBuilder {
    script_char_budget: usize,
    reference_char_budget: usize,
}

impl PromptBuilder {
    pub fn new(script_char_budget: usize, reference_char_budget: usize) -> Self {
        Self {
            script_char_budget,
            reference_char_budget,
        }
    }

    /// Builds the complete prompt: persona and format rules, currency and
    /// pricing context, the (truncated) script, then one block per
    /// requested section.
    pub fn build(&self, request: &ReportRequest, reference: Option<&str>) -> String {
        let mut prompt = String::new();

        prompt.push_str("Actúa como Productor Ejecutivo y Analista de Datos.\n");
        prompt.push_str("Analiza el guion adjunto.\n\n");
        prompt.push_str("INSTRUCCIÓN DE FORMATO:\n");
        prompt.push_str("- NO escribas introducciones ni saludos.\n");
        prompt.push_str("- Empieza INMEDIATAMENTE con el primer título Markdown.\n");
        prompt.push_str("- Genera TODAS las secciones solicitadas sin omitir ninguna.\n\n");

        prompt.push_str(&format!("CONTEXTO: 1 USD = ${} ARS.\n", request.currency_rate));
        let reference_text = reference
            .map(|r| truncate_chars(r, self.reference_char_budget))
            .unwrap_or("N/A");
        prompt.push_str(&format!("Datos SICA: {}...\n", reference_text));
        prompt.push_str(&format!(
            "GUION: {}\n\n",
            truncate_chars(&request.script_text, self.script_char_budget)
        ));

        prompt.push_str("ESTRUCTURA OBLIGATORIA DEL REPORTE (Sigue este orden):\n");

        if request.sections.narrative {
            prompt.push_str(NARRATIVE_SECTION);
        }
        if request.sections.production {
            prompt.push_str(PRODUCTION_SECTION);
        }
        if request.sections.diversity {
            prompt.push_str(DIVERSITY_SECTION);
        }

        prompt
    }
}

const NARRATIVE_SECTION: &str = r#"
--------------------------------------------------
SECCIÓN 1: ANÁLISIS NARRATIVO (Obligatorio)
--------------------------------------------------
Formato Markdown:
### 1. ANÁLISIS NARRATIVO
* Logline, Sinopsis.
* **Crítica (1-10):** Evaluación de originalidad, estructura, personajes y diálogos.
* **Referencias:** 5 películas similares.

AL FINAL DE ESTA SECCIÓN, inserta estos DOS bloques JSON ocultos (usa bloques de código ```json ... ```):

JSON 1 (Temas): [{"Personaje": "A", "Tema": "X", "Porcentaje": 50}...]
JSON 2 (Evolución):
[
  {"Momento": "1. Setup", "Alegría": 80, "Tristeza": 10, "Ira": 5, "Miedo": 5, "Tensión": 10},
  ... hasta el momento 8
]
"#;

const PRODUCTION_SECTION: &str = r#"
--------------------------------------------------
SECCIÓN 2: PRODUCCIÓN (Obligatorio)
--------------------------------------------------
Formato Markdown:
### 2. PRODUCCIÓN
* **Casting Ideal:** Sugiere actores (preferiblemente mercado Latam/Argentina) para los roles principales.
* **Desglose de Locaciones:** Lista las locaciones principales necesarias, describiendo su estética (Look & Feel) y complejidad logística (INT/EXT, Día/Noche).
* **SI O SI Genera una Tabla de Presupuesto en USD (Pre, Rodaje, Post). Tiene que ser en formato tabla obligatoriamente. El presupuesto tiene que ser moderado. NO EXAGERADO, NO MUY BAJO. Tiene que ser estándar, considerando una producción mediana. También tiene que ser consistente con todas las consultas. No puede ser un presupuesto muy distinto en consultas distintas.**
* **Plan de financiamiento potencial.**
"#;

const DIVERSITY_SECTION: &str = r#"
--------------------------------------------------
SECCIÓN 3: DIVERSIDAD (Obligatorio)
--------------------------------------------------
Formato Markdown:
### 3. DIVERSIDAD
Analiza Test Bechdel y Estereotipos.
TAREA DE CÁLCULO:
Analiza los personajes que hablan en el guion.
Estima el porcentaje REAL de líneas de diálogo dichas por Hombres, Mujeres y Disidencias en ESTE guion específico. No inventes datos genéricos.

AL FINAL, inserta el JSON con tus cálculos (debe sumar 100%):
```json
{ "Hombres": XX, "Mujeres": XX, "Disidencias": XX }
```
"#;

/// Truncate to at most `budget` characters, never splitting a code point.
fn truncate_chars(s: &str, budget: usize) -> &str {
    match s.char_indices().nth(budget) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{ReportRequest, SectionToggles};

    fn request(narrative: bool, production: bool, diversity: bool) -> ReportRequest {
        ReportRequest {
            script_text: "INT. CASA - NOCHE\nANA observa la ventana.".to_string(),
            currency_rate: 1250.0,
            sections: SectionToggles {
                narrative,
                production,
                diversity,
            },
        }
    }

    #[test]
    fn includes_only_requested_sections() {
        let builder = PromptBuilder::new(350_000, 5_000);
        let prompt = builder.build(&request(true, false, true), None);

        assert!(prompt.contains("ANÁLISIS NARRATIVO"));
        assert!(prompt.contains("DIVERSIDAD"));
        assert!(!prompt.contains("SECCIÓN 2: PRODUCCIÓN"));
    }

    #[test]
    fn embeds_currency_and_script() {
        let builder = PromptBuilder::new(350_000, 5_000);
        let prompt = builder.build(&request(true, true, false), None);

        assert!(prompt.contains("1 USD = $1250 ARS"));
        assert!(prompt.contains("INT. CASA - NOCHE"));
    }

    #[test]
    fn missing_reference_becomes_na() {
        let builder = PromptBuilder::new(350_000, 5_000);
        let prompt = builder.build(&request(false, true, false), None);

        assert!(prompt.contains("Datos SICA: N/A..."));
    }

    #[test]
    fn reference_is_truncated_to_budget() {
        let builder = PromptBuilder::new(350_000, 10);
        let reference = "tarifas ".repeat(100);
        let prompt = builder.build(&request(false, true, false), Some(&reference));

        assert!(prompt.contains("Datos SICA: tarifas ta..."));
    }

    #[test]
    fn truncation_respects_multibyte_boundaries() {
        let text = "ñandú".repeat(10);
        let truncated = truncate_chars(&text, 7);
        assert_eq!(truncated, "ñandúña");
    }

    #[test]
    fn script_over_budget_is_cut() {
        let builder = PromptBuilder::new(5, 5_000);
        let mut req = request(true, false, false);
        req.script_text = "abcdefghij".to_string();
        let prompt = builder.build(&req, None);

        assert!(prompt.contains("GUION: abcde\n"));
        assert!(!prompt.contains("abcdef"));
    }

    #[test]
    fn json_contracts_name_the_wire_keys() {
        let builder = PromptBuilder::new(350_000, 5_000);
        let prompt = builder.build(&request(true, false, true), None);

        for key in ["Personaje", "Tema", "Porcentaje", "Momento", "Alegría", "Tensión"] {
            assert!(prompt.contains(key), "prompt should name key {}", key);
        }
        assert!(prompt.contains(r#"{ "Hombres": XX, "Mujeres": XX, "Disidencias": XX }"#));
    }
}
