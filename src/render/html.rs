//! Report page assembly
//!
//! The report is one self-contained HTML page: the inlined SVG of the
//! laid-out pipeline, a meta-diff toggle button, and a script block
//! carrying the diff payloads keyed by step fingerprint. Click handlers
//! open a popup that renders the stored line diff; nothing is
//! recomputed in the page.

use std::collections::BTreeMap;

use crate::domain::{DiffBundle, LineEdit};

const POPUP_SCRIPT: &str = r#"
function buildDiff(title, lines) {
  var win = open('', new Date() + '', 'height=400,width=400');
  win.document.title = 'diff: ' + title;
  var pre = win.document.createElement('pre');
  pre.style.padding = '1em';
  for (var i = 0; i < lines.length; i++) {
    var line = lines[i];
    var kind = line.charAt(0);
    var row = win.document.createElement('div');
    row.style.color = kind == '+' ? 'green' : (kind == '-' ? 'red' : '#999');
    row.style.fontWeight = kind == ' ' ? 'normal' : 'bold';
    row.appendChild(win.document.createTextNode(line.substr(2)));
    pre.appendChild(row);
  }
  win.document.body.appendChild(pre);
}

document.getElementById('show-mdiff').addEventListener('click', function () {
  buildDiff('meta diff', metaDiff);
});

for (var id in stepDiffs) {
  (function (el, id) {
    if (!el) return;
    el.addEventListener('click', function () {
      buildDiff(stepNames[id], stepDiffs[id]);
    });
    el.style.cursor = 'pointer';
  })(document.getElementById(id), id);
}
"#;

/// Assembles the final report around the rendered SVG.
///
/// Every step's edit script and display name, plus the metadata script,
/// are embedded keyed by fingerprint so the page can show any diff on
/// demand without recomputing it.
pub fn render_report(svg: &str, bundle: &DiffBundle) -> Result<String, serde_json::Error> {
    let mut diffs: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    let mut names: BTreeMap<&str, &str> = BTreeMap::new();
    for (fp, name) in bundle.fingerprints() {
        if let Some(script) = bundle.script(name) {
            diffs.insert(fp, prefixed_lines(script));
        }
        names.insert(fp, name);
    }

    let diffs_json = script_safe(serde_json::to_string(&diffs)?);
    let names_json = script_safe(serde_json::to_string(&names)?);
    let meta_json = script_safe(serde_json::to_string(&prefixed_lines(bundle.meta_script()))?);

    let meta_flag = if bundle.metadata_changed() { " (+)" } else { "" };

    Ok(format!(
        r#"<!doctype html>
<html><body>
<div style="margin: 1em">
  <button id="show-mdiff">Show Meta Diff{meta_flag}</button></div>
<div style="text-align: center">
{svg}
</div></body><script>
var stepDiffs = {diffs_json};
var stepNames = {names_json};
var metaDiff = {meta_json};
{POPUP_SCRIPT}</script></html>
"#
    ))
}

fn prefixed_lines(script: &[LineEdit]) -> Vec<String> {
    script.iter().map(LineEdit::prefixed).collect()
}

/// Escapes `</` so payload text can never terminate the surrounding
/// script element.
fn script_safe(json: String) -> String {
    json.replace("</", "<\\/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{fingerprint, Hop, PipelineDoc, StructuralDiff};

    fn doc(steps: &[(&str, &str)], metadata: &str) -> PipelineDoc {
        PipelineDoc {
            metadata: metadata.to_string(),
            steps: steps
                .iter()
                .map(|(n, b)| (n.to_string(), b.to_string()))
                .collect(),
            hops: [Hop::new("A", "B")].into_iter().collect(),
        }
    }

    fn report(old: &PipelineDoc, new: &PipelineDoc) -> String {
        let structural = StructuralDiff::between(old, new);
        let bundle = DiffBundle::build(old, new, &structural);
        render_report("<svg><g/></svg>", &bundle).unwrap()
    }

    #[test]
    fn embeds_the_rendered_svg() {
        let a = doc(&[("A", "<step><name>A</name></step>")], "<m/>");
        let html = report(&a, &a.clone());

        assert!(html.contains("<svg><g/></svg>"));
        assert!(html.starts_with("<!doctype html>"));
    }

    #[test]
    fn embeds_scripts_keyed_by_fingerprint() {
        let old = doc(&[("A", "<step><name>A</name><v>1</v></step>")], "<m/>");
        let new = doc(&[("A", "<step><name>A</name><v>2</v></step>")], "<m/>");
        let html = report(&old, &new);

        let fp = fingerprint("A");
        assert!(html.contains(&format!("\"{}\"", fp)));
        assert!(html.contains("+ <v>2<\\/v>"));
        assert!(html.contains("- <v>1<\\/v>"));
    }

    #[test]
    fn embeds_display_names_for_popup_titles() {
        let a = doc(&[("Sort rows", "<step><name>Sort rows</name></step>")], "<m/>");
        let html = report(&a, &a.clone());

        assert!(html.contains("\"Sort rows\""));
    }

    #[test]
    fn meta_button_is_flagged_only_when_metadata_changed() {
        let old = doc(&[("A", "<step><name>A</name></step>")], "<info><v>1</v></info>");
        let same = report(&old, &old.clone());
        assert!(same.contains(">Show Meta Diff<"));
        assert!(!same.contains("Show Meta Diff (+)"));

        let new = doc(&[("A", "<step><name>A</name></step>")], "<info><v>2</v></info>");
        let changed = report(&old, &new);
        assert!(changed.contains("Show Meta Diff (+)"));
    }

    #[test]
    fn embedded_json_cannot_close_the_script_element() {
        let old = doc(&[("A", "<step><name>A</name></step>")], "<m/>");
        let html = report(&old, &old.clone());

        let script_start = html.find("<script>").unwrap();
        let payload = &html[script_start + "<script>".len()..];
        let script_end = payload.find("</script>").unwrap();
        assert!(!payload[..script_end].contains("</step>"));
    }

    #[test]
    fn popup_wiring_is_present() {
        let a = doc(&[("A", "<step><name>A</name></step>")], "<m/>");
        let html = report(&a, &a.clone());

        assert!(html.contains("function buildDiff"));
        assert!(html.contains("getElementById('show-mdiff')"));
        assert!(html.contains("el.style.cursor = 'pointer'"));
    }
}
