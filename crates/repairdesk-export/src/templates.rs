//! Embedded minijinja templates. Names end in `.html` so output is
//! auto-escaped.

pub const EXPORT_NAME: &str = "export.html";

pub const EXPORT: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: Arial, sans-serif; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { border: 1px solid #ddd; padding: 8px; text-align: left; }
th { background-color: #3b82f6; color: white; }
tr:nth-child(even) { background-color: #f2f2f2; }
@media print { th { -webkit-print-color-adjust: exact; print-color-adjust: exact; } }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<table>
<thead><tr>{% for header in headers %}<th>{{ header }}</th>{% endfor %}</tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>
</body>
</html>
"#;

pub const REPORT_NAME: &str = "report.html";

pub const REPORT: &str = r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{{ title }}</title>
<style>
body { font-family: Arial, sans-serif; margin: 40px; color: #333; }
h1 { color: #1e293b; border-bottom: 3px solid #3b82f6; padding-bottom: 10px; }
.meta { background: #f1f5f9; padding: 15px; border-radius: 8px; margin: 20px 0; }
.meta p { margin: 5px 0; }
table { width: 100%; border-collapse: collapse; margin: 20px 0; }
th, td { border: 1px solid #cbd5e1; padding: 12px; text-align: left; }
th { background-color: #3b82f6; color: white; font-weight: 600; }
tr:nth-child(even) { background-color: #f8fafc; }
.stats { background: #ecfdf5; padding: 15px; border-radius: 8px; margin: 20px 0; }
.stats h3 { color: #059669; margin-top: 0; }
.stat-item { display: inline-block; margin: 10px 20px 10px 0; }
.stat-label { color: #6b7280; font-size: 14px; }
.stat-value { font-size: 24px; font-weight: bold; color: #059669; }
.footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #e2e8f0; text-align: center; color: #64748b; }
</style>
</head>
<body>
<h1>{{ title }}</h1>
<div class="meta">
<p><strong>Generated:</strong> {{ generated_on }}</p>
{% if period %}<p><strong>Period:</strong> {{ period.from }} to {{ period.to }}</p>
{% endif %}<p><strong>Total records:</strong> {{ record_count }}</p>
{% if comments %}<p><strong>Comments:</strong> {{ comments }}</p>
{% endif %}</div>
{% if stats is not none %}<div class="stats">
<h3>Summary statistics</h3>
{% for stat in stats %}<div class="stat-item"><div class="stat-label">{{ stat.label }} ({{ stat.aggregation }})</div><div class="stat-value">{{ stat.value }}</div></div>
{% endfor %}</div>
{% endif %}<table>
<thead><tr>{% for header in headers %}<th>{{ header }}</th>{% endfor %}</tr></thead>
<tbody>
{% for row in rows %}<tr>{% for cell in row %}<td>{{ cell }}</td>{% endfor %}</tr>
{% endfor %}</tbody>
</table>
<div class="footer"><p>Report generated automatically &bull; {{ company }}</p></div>
</body>
</html>
"#;
