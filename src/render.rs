//! render.rs — Páginas HTML (formulário de upload e tabela de resultados)

use minijinja::{Environment, context};

use crate::types::{AvailabilityPolicy, AvailabilityRow};

const LAYOUT: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{% block title %}Alarm Availability{% endblock %}</title>
  <style>
    body { font-family: sans-serif; margin: 2rem; }
    table { border-collapse: collapse; }
    th, td { border: 1px solid #999; padding: .4rem .8rem; text-align: left; }
    th { background: #eee; }
  </style>
</head>
<body>
{% block body %}{% endblock %}
</body>
</html>
"#;

const UPLOAD: &str = r#"{% extends "layout.html" %}
{% block body %}
<h1>Alarm Availability Report</h1>
<p>Upload a CSV or Excel alarm log with the columns <em>Alarm ID</em>, <em>Alarm Source</em> and <em>Duration</em>.</p>
<form action="/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file" accept=".csv,.xls,.xlsx">
  <button type="submit">Upload</button>
</form>
{% endblock %}
"#;

const RESULT: &str = r#"{% extends "layout.html" %}
{% block title %}Availability Results{% endblock %}
{% block body %}
<h1>Availability Results</h1>
<p>Alarm ID {{ target_alarm_id }}, duration &gt;= {{ min_duration }} minutes, window {{ window }} minutes.</p>
<table>
  <thead>
    <tr><th>Alarm Source</th><th>Total Downtime</th><th>Availability (%)</th></tr>
  </thead>
  <tbody>
  {% for row in results %}
    <tr><td>{{ row.alarm_source }}</td><td>{{ row.downtime }}</td><td>{{ row.availability }}</td></tr>
  {% endfor %}
  </tbody>
</table>
<p><small>Generated at {{ generated_at }}</small></p>
<p><a href="/download">Download Excel</a> | <a href="/">Upload another file</a></p>
{% endblock %}
"#;

/// Renderizador com os templates embutidos.
#[derive(Debug)]
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", LAYOUT)?;
        env.add_template("upload.html", UPLOAD)?;
        env.add_template("result.html", RESULT)?;
        Ok(Self { env })
    }

    pub fn upload_page(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("upload.html")?.render(context! {})
    }

    pub fn result_page(
        &self,
        results: &[AvailabilityRow],
        policy: &AvailabilityPolicy,
        generated_at: &str,
    ) -> Result<String, minijinja::Error> {
        self.env.get_template("result.html")?.render(context! {
            results => results,
            target_alarm_id => policy.target_alarm_id,
            min_duration => policy.min_duration_minutes.to_string(),
            window => policy.window_minutes.to_string(),
            generated_at => generated_at,
        })
    }
}
