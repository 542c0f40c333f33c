//! Browser viewer page.
//!
//! A 3×3 grid of `<img>` elements (`img00` .. `img22`) with arrow controls and
//! layer/format pickers. All navigation goes through the JSON API; the page
//! only copies the returned URLs into the image slots.

pub(crate) const VIEWER_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>wmtsgrid viewer</title>
  <style>
    body { font-family: sans-serif; margin: 16px; }
    #controls { margin-bottom: 12px; line-height: 32px; }
    #controls button { width: 36px; height: 28px; }
    #grid { border-collapse: collapse; }
    #grid td { padding: 0; border: 1px solid #ccc; width: 256px; height: 256px; }
    #grid img { display: block; width: 256px; height: 256px; }
    #status { font-family: monospace; margin-top: 8px; min-height: 1.2em; }
    #status.error { color: #b00; }
  </style>
</head>
<body>
  <div id="controls">
    <label for="layerSelect">Layer: </label>
    <select id="layerSelect"></select>
    <label for="formatSelect">Format: </label>
    <select id="formatSelect"></select>
    <br />
    <button data-cmd="left" title="Left (h)">&larr;</button>
    <button data-cmd="up" title="Up (k)">&uarr;</button>
    <button data-cmd="down" title="Down (j)">&darr;</button>
    <button data-cmd="right" title="Right (l)">&rarr;</button>
    <button data-cmd="zoom-in" title="Zoom in (+)">+</button>
    <button data-cmd="zoom-out" title="Zoom out (-)">&minus;</button>
  </div>

  <table id="grid">
    <tr><td><img id="img00" alt="" /></td><td><img id="img01" alt="" /></td><td><img id="img02" alt="" /></td></tr>
    <tr><td><img id="img10" alt="" /></td><td><img id="img11" alt="" /></td><td><img id="img12" alt="" /></td></tr>
    <tr><td><img id="img20" alt="" /></td><td><img id="img21" alt="" /></td><td><img id="img22" alt="" /></td></tr>
  </table>

  <div id="status"></div>

  <script>
    const layerSelect = document.getElementById('layerSelect');
    const formatSelect = document.getElementById('formatSelect');
    const statusLine = document.getElementById('status');

    function selectionQuery() {
      const params = new URLSearchParams();
      if (layerSelect.value) params.set('layer', layerSelect.value);
      if (formatSelect.value) params.set('format', formatSelect.value);
      return params.toString();
    }

    function showStatus(text, isError) {
      statusLine.textContent = text;
      statusLine.className = isError ? 'error' : '';
    }

    function draw(grid) {
      grid.tiles.forEach((row, i) => {
        row.forEach((url, j) => {
          const img = document.getElementById('img' + i + j);
          if (img && url) img.src = url;
        });
      });
      const s = grid.state;
      showStatus(`col:${s.column} row:${s.row} zoom:${s.zoom} (${s.matrix}) layer:${s.layer} format:${s.format}`, false);
    }

    async function handle(res) {
      const body = await res.json();
      if (!res.ok) {
        showStatus(body.error, true);
        return;
      }
      draw(body);
    }

    async function navigate(cmd) {
      const res = await fetch(`/navigate/${cmd}?${selectionQuery()}`, { method: 'POST' });
      await handle(res);
    }

    async function redraw() {
      const res = await fetch(`/grid?${selectionQuery()}`);
      await handle(res);
    }

    function fill(select, values) {
      select.innerHTML = '';
      values.forEach(v => {
        const opt = document.createElement('option');
        opt.value = v;
        opt.textContent = v;
        select.appendChild(opt);
      });
    }

    async function init() {
      const res = await fetch('/options');
      const options = await res.json();
      fill(layerSelect, options.layers);
      fill(formatSelect, options.formats);
      await redraw();
    }

    document.querySelectorAll('#controls button').forEach(btn => {
      btn.addEventListener('click', () => navigate(btn.dataset.cmd).catch(console.error));
    });

    const keys = {
      ArrowLeft: 'left', ArrowRight: 'right', ArrowUp: 'up', ArrowDown: 'down',
      h: 'left', l: 'right', k: 'up', j: 'down', '+': 'zoom-in', '-': 'zoom-out',
    };
    document.addEventListener('keydown', e => {
      if (e.target.tagName === 'SELECT') return;
      const cmd = keys[e.key];
      if (cmd) {
        e.preventDefault();
        navigate(cmd).catch(console.error);
      }
    });

    layerSelect.addEventListener('change', () => redraw().catch(console.error));
    formatSelect.addEventListener('change', () => redraw().catch(console.error));

    init().catch(console.error);
  </script>
</body>
</html>
"#;
