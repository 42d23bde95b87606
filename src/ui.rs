use crate::models::{ClickStatistics, Session};

pub fn render_index(session: &Session, stats: &ClickStatistics) -> String {
    INDEX_HTML
        .replace("{{MERIT}}", &session.merit.to_string())
        .replace("{{TODAY_TAPS}}", &session.today_taps.to_string())
        .replace("{{COMBO}}", &session.combo.to_string())
        .replace("{{TOTAL_CLICKS}}", &stats.total_clicks.to_string())
        .replace("{{CURRENT_STREAK}}", &stats.streak_data.current_streak.to_string())
        .replace("{{ZEN_QUOTE}}", &session.zen_quote)
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="zh-CN">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>电子木鱼</title>
  <style>
    @import url('https://fonts.googleapis.com/css2?family=Noto+Serif+SC:wght@500;700&family=Noto+Sans+SC:wght@400;500&display=swap');

    :root {
      --bg-1: #1b1714;
      --bg-2: #3a2c1f;
      --ink: #f3ead8;
      --muted: #b8a98e;
      --accent: #e0a84c;
      --accent-2: #8c5a2b;
      --card: rgba(49, 38, 28, 0.82);
      --shadow: 0 24px 60px rgba(0, 0, 0, 0.45);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 65%),
        linear-gradient(160deg, var(--bg-1), #241b13 70%, #191410 100%);
      color: var(--ink);
      font-family: "Noto Sans SC", "PingFang SC", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(960px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-direction: column;
      gap: 6px;
      text-align: center;
    }

    h1 {
      font-family: "Noto Serif SC", "Songti SC", serif;
      font-weight: 700;
      font-size: clamp(2rem, 4vw, 2.6rem);
      margin: 0;
      color: var(--accent);
    }

    .quote {
      margin: 0;
      color: var(--muted);
      font-size: 1rem;
      font-style: italic;
      min-height: 1.4em;
    }

    .panel {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(140px, 1fr));
      gap: 16px;
    }

    .stat {
      background: rgba(0, 0, 0, 0.25);
      border-radius: 18px;
      padding: 16px;
      border: 1px solid rgba(224, 168, 76, 0.16);
      display: grid;
      gap: 6px;
      text-align: center;
    }

    .stat .label {
      font-size: 0.8rem;
      letter-spacing: 0.14em;
      color: var(--muted);
    }

    .stat .value {
      font-size: 1.6rem;
      font-weight: 500;
      color: var(--ink);
    }

    .stat .value.merit {
      color: var(--accent);
    }

    .fish-area {
      display: grid;
      place-items: center;
      position: relative;
      padding: 12px 0 4px;
    }

    #fish {
      width: 220px;
      height: 170px;
      border-radius: 46% 46% 52% 52%;
      background: radial-gradient(circle at 35% 30%, #9c6b35, #6e4521 60%, #53341a);
      border: 3px solid rgba(224, 168, 76, 0.35);
      display: grid;
      place-items: center;
      font-family: "Noto Serif SC", serif;
      font-size: 2rem;
      color: rgba(243, 234, 216, 0.85);
      cursor: pointer;
      user-select: none;
      transition: transform 90ms ease;
    }

    #fish:active {
      transform: scale(0.96);
    }

    #fish.knocked {
      animation: knock 220ms ease;
    }

    @keyframes knock {
      30% {
        transform: scale(0.93) rotate(-1.5deg);
      }
      100% {
        transform: scale(1);
      }
    }

    .float-text {
      position: absolute;
      pointer-events: none;
      color: var(--accent);
      font-weight: 500;
      animation: floatUp 1.1s ease forwards;
    }

    @keyframes floatUp {
      to {
        transform: translateY(-70px);
        opacity: 0;
      }
    }

    .combo-badge {
      position: absolute;
      top: 0;
      right: 18%;
      background: var(--accent-2);
      color: var(--ink);
      border-radius: 999px;
      padding: 6px 14px;
      font-size: 0.9rem;
      opacity: 0;
      transition: opacity 200ms ease;
    }

    .combo-badge.visible {
      opacity: 1;
    }

    .columns {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(260px, 1fr));
      gap: 20px;
      align-items: start;
    }

    .card {
      background: rgba(0, 0, 0, 0.22);
      border-radius: 20px;
      border: 1px solid rgba(224, 168, 76, 0.14);
      padding: 18px;
      display: grid;
      gap: 12px;
    }

    .card h2 {
      margin: 0;
      font-size: 1.1rem;
      color: var(--accent);
      font-weight: 500;
    }

    .achievement {
      display: flex;
      gap: 10px;
      align-items: center;
      padding: 8px 10px;
      border-radius: 12px;
      background: rgba(0, 0, 0, 0.2);
      opacity: 0.45;
    }

    .achievement.unlocked {
      opacity: 1;
      border: 1px solid rgba(224, 168, 76, 0.3);
    }

    .achievement .icon {
      font-size: 1.4rem;
    }

    .achievement .name {
      font-size: 0.95rem;
    }

    .achievement .desc {
      font-size: 0.8rem;
      color: var(--muted);
    }

    .wish-list {
      display: grid;
      gap: 8px;
      max-height: 160px;
      overflow-y: auto;
    }

    .wish-item {
      font-size: 0.9rem;
      color: var(--ink);
      background: rgba(0, 0, 0, 0.2);
      border-radius: 10px;
      padding: 8px 10px;
    }

    .wish-item .cost {
      color: var(--muted);
      font-size: 0.8rem;
    }

    input[type="text"], select {
      width: 100%;
      background: rgba(0, 0, 0, 0.3);
      border: 1px solid rgba(224, 168, 76, 0.25);
      border-radius: 10px;
      color: var(--ink);
      padding: 10px 12px;
      font-size: 0.95rem;
    }

    input[type="range"] {
      width: 100%;
      accent-color: var(--accent);
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 10px 18px;
      font-size: 0.95rem;
      font-weight: 500;
      cursor: pointer;
      background: var(--accent-2);
      color: var(--ink);
      transition: transform 150ms ease;
    }

    button:active {
      transform: scale(0.97);
    }

    button.primary {
      background: var(--accent);
      color: #241b13;
    }

    .row {
      display: flex;
      gap: 10px;
      align-items: center;
      flex-wrap: wrap;
    }

    .row label {
      font-size: 0.85rem;
      color: var(--muted);
    }

    .history {
      display: grid;
      gap: 6px;
      font-size: 0.85rem;
    }

    .history .day {
      display: flex;
      justify-content: space-between;
      color: var(--muted);
    }

    .history .day .count {
      color: var(--ink);
    }

    .status {
      font-size: 0.9rem;
      color: var(--muted);
      text-align: center;
      min-height: 1.2em;
    }

    .status[data-type="error"] {
      color: #e06c5a;
    }

    .status[data-type="ok"] {
      color: #9fc183;
    }

    @media (max-width: 600px) {
      .app {
        padding: 28px 20px;
      }
    }
  </style>
</head>
<body>
  <main class="app">
    <header>
      <h1>电子木鱼</h1>
      <p class="quote" id="quote">{{ZEN_QUOTE}}</p>
    </header>

    <section class="panel">
      <div class="stat">
        <span class="label">功德</span>
        <span id="merit" class="value merit">{{MERIT}}</span>
      </div>
      <div class="stat">
        <span class="label">今日敲击</span>
        <span id="today-taps" class="value">{{TODAY_TAPS}}</span>
      </div>
      <div class="stat">
        <span class="label">连击</span>
        <span id="combo" class="value">{{COMBO}}</span>
      </div>
      <div class="stat">
        <span class="label">累计敲击</span>
        <span id="total-clicks" class="value">{{TOTAL_CLICKS}}</span>
      </div>
      <div class="stat">
        <span class="label">连续天数</span>
        <span id="streak" class="value">{{CURRENT_STREAK}}</span>
      </div>
    </section>

    <section class="fish-area" id="fish-area">
      <div class="combo-badge" id="combo-badge"></div>
      <div id="fish" role="button" aria-label="敲击木鱼">木鱼</div>
    </section>

    <section class="columns">
      <div class="card">
        <h2>成就</h2>
        <div id="achievements"></div>
      </div>

      <div class="card">
        <h2>祈愿</h2>
        <div class="row">
          <input type="text" id="wish-input" maxlength="100" placeholder="写下你的心愿（消耗10功德）" />
          <button class="primary" id="wish-btn" type="button">许愿</button>
        </div>
        <div class="wish-list" id="wish-list"></div>
      </div>

      <div class="card">
        <h2>统计</h2>
        <div class="history" id="history"></div>
        <div class="row">
          <span class="label" style="color: var(--muted); font-size: 0.85rem;">
            本周 <span id="week-clicks">0</span> · 本月 <span id="month-clicks">0</span> · 最长连续 <span id="longest-streak">0</span> 天
          </span>
        </div>
      </div>

      <div class="card">
        <h2>设置</h2>
        <div class="row">
          <label for="volume">音量</label>
          <input type="range" id="volume" min="0" max="1" step="0.05" />
        </div>
        <div class="row">
          <label for="sound">音效</label>
          <select id="sound">
            <option value="classic">古刹</option>
            <option value="temple">禅院</option>
            <option value="nature">山林</option>
            <option value="modern">清音</option>
          </select>
        </div>
        <div class="row">
          <label for="auto-speed">自动敲击</label>
          <select id="auto-speed">
            <option value="1">1 次/秒</option>
            <option value="2">2 次/秒</option>
            <option value="5">5 次/秒</option>
          </select>
          <select id="auto-duration">
            <option value="1">1 分钟</option>
            <option value="5">5 分钟</option>
            <option value="10">10 分钟</option>
          </select>
          <button id="auto-btn" type="button">开始</button>
        </div>
      </div>
    </section>

    <div class="status" id="status"></div>
  </main>

  <script>
    const meritEl = document.getElementById('merit');
    const todayEl = document.getElementById('today-taps');
    const comboEl = document.getElementById('combo');
    const totalEl = document.getElementById('total-clicks');
    const streakEl = document.getElementById('streak');
    const quoteEl = document.getElementById('quote');
    const statusEl = document.getElementById('status');
    const fishEl = document.getElementById('fish');
    const fishArea = document.getElementById('fish-area');
    const comboBadge = document.getElementById('combo-badge');
    const achievementsEl = document.getElementById('achievements');
    const wishInput = document.getElementById('wish-input');
    const wishList = document.getElementById('wish-list');
    const historyEl = document.getElementById('history');
    const weekEl = document.getElementById('week-clicks');
    const monthEl = document.getElementById('month-clicks');
    const longestEl = document.getElementById('longest-streak');
    const volumeEl = document.getElementById('volume');
    const soundEl = document.getElementById('sound');
    const autoSpeedEl = document.getElementById('auto-speed');
    const autoDurationEl = document.getElementById('auto-duration');
    const autoBtn = document.getElementById('auto-btn');

    const FLOAT_TEXTS = ['+1 功德', '功德+1', '善哉善哉', '阿弥陀佛', '功德无量'];
    let audioContext = null;
    let comboTimer = null;
    let autoPoll = null;
    let session = null;

    const setStatus = (message, type) => {
      statusEl.textContent = message;
      statusEl.dataset.type = type || '';
      if (message) {
        setTimeout(() => { statusEl.textContent = ''; statusEl.dataset.type = ''; }, 2200);
      }
    };

    const playKnock = () => {
      const volume = parseFloat(volumeEl.value);
      if (!volume) return;
      try {
        if (!audioContext) {
          audioContext = new (window.AudioContext || window.webkitAudioContext)();
        }
        const configs = {
          classic: { freq: 200, decay: 0.3, type: 'sine' },
          temple: { freq: 150, decay: 0.5, type: 'triangle' },
          nature: { freq: 300, decay: 0.2, type: 'sawtooth' },
          modern: { freq: 250, decay: 0.4, type: 'square' }
        };
        const config = configs[soundEl.value] || configs.classic;
        const oscillator = audioContext.createOscillator();
        const gain = audioContext.createGain();
        oscillator.connect(gain);
        gain.connect(audioContext.destination);
        oscillator.frequency.setValueAtTime(config.freq, audioContext.currentTime);
        oscillator.type = config.type;
        gain.gain.setValueAtTime(0, audioContext.currentTime);
        gain.gain.linearRampToValueAtTime(volume * 0.3, audioContext.currentTime + 0.01);
        gain.gain.exponentialRampToValueAtTime(0.001, audioContext.currentTime + config.decay);
        oscillator.start(audioContext.currentTime);
        oscillator.stop(audioContext.currentTime + config.decay);
      } catch (err) {
        // Audio is decorative only.
      }
    };

    const showFloatText = (x, y) => {
      const el = document.createElement('span');
      el.className = 'float-text';
      el.textContent = FLOAT_TEXTS[Math.floor(Math.random() * FLOAT_TEXTS.length)];
      el.style.left = x + 'px';
      el.style.top = y + 'px';
      fishArea.appendChild(el);
      setTimeout(() => el.remove(), 1100);
    };

    const showCombo = (combo) => {
      comboEl.textContent = combo;
      if (combo >= 2) {
        comboBadge.textContent = combo + ' 连击';
        comboBadge.classList.add('visible');
      } else {
        comboBadge.classList.remove('visible');
      }
      if (comboTimer) {
        clearTimeout(comboTimer);
      }
      comboTimer = setTimeout(() => {
        comboEl.textContent = '0';
        comboBadge.classList.remove('visible');
      }, 2000);
    };

    const applyTapResponse = (data) => {
      meritEl.textContent = data.merit;
      todayEl.textContent = data.todayTaps;
      totalEl.textContent = data.totalClicks;
      streakEl.textContent = data.currentStreak;
      showCombo(data.combo);
      if (data.newAchievements.length) {
        setStatus('成就解锁：' + data.newAchievements.join('、'), 'ok');
        loadAchievements().catch(() => {});
      }
    };

    const tap = async (event) => {
      const rect = fishArea.getBoundingClientRect();
      const x = event ? event.clientX - rect.left : rect.width / 2;
      const y = event ? event.clientY - rect.top : rect.height / 3;

      fishEl.classList.remove('knocked');
      void fishEl.offsetWidth;
      fishEl.classList.add('knocked');
      playKnock();
      showFloatText(x, y);

      const res = await fetch('/api/tap', { method: 'POST' });
      if (!res.ok) {
        throw new Error('敲击失败');
      }
      applyTapResponse(await res.json());
      loadStats().catch(() => {});
    };

    const loadSession = async () => {
      const res = await fetch('/api/session');
      if (!res.ok) {
        throw new Error('无法加载会话');
      }
      session = await res.json();
      meritEl.textContent = session.merit;
      todayEl.textContent = session.todayTaps;
      comboEl.textContent = session.combo;
      quoteEl.textContent = session.zenQuote;
      volumeEl.value = session.volume;
      soundEl.value = session.selectedSound;
      autoBtn.textContent = session.isAutoTapping ? '停止' : '开始';
      renderWishes(session.wishes);
    };

    const renderWishes = (wishes) => {
      wishList.innerHTML = '';
      wishes.slice().reverse().forEach((wish) => {
        const el = document.createElement('div');
        el.className = 'wish-item';
        const cost = document.createElement('span');
        cost.className = 'cost';
        cost.textContent = ' -' + wish.meritCost + ' 功德';
        el.textContent = wish.content;
        el.appendChild(cost);
        wishList.appendChild(el);
      });
    };

    const loadStats = async () => {
      const res = await fetch('/api/stats');
      if (!res.ok) {
        throw new Error('无法加载统计');
      }
      const stats = await res.json();
      totalEl.textContent = stats.totalClicks;
      streakEl.textContent = stats.streakData.currentStreak;
      weekEl.textContent = stats.weekClicks;
      monthEl.textContent = stats.monthClicks;
      longestEl.textContent = stats.streakData.longestStreak;

      historyEl.innerHTML = '';
      stats.dailyHistory.slice(-7).reverse().forEach((record) => {
        const el = document.createElement('div');
        el.className = 'day';
        const date = document.createElement('span');
        date.textContent = record.date;
        const count = document.createElement('span');
        count.className = 'count';
        count.textContent = record.clicks + ' 次';
        el.appendChild(date);
        el.appendChild(count);
        historyEl.appendChild(el);
      });
    };

    const loadAchievements = async () => {
      const res = await fetch('/api/achievements');
      if (!res.ok) {
        throw new Error('无法加载成就');
      }
      const achievements = await res.json();
      achievementsEl.innerHTML = '';
      achievements.forEach((achievement) => {
        const el = document.createElement('div');
        el.className = 'achievement' + (achievement.unlocked ? ' unlocked' : '');
        const icon = document.createElement('span');
        icon.className = 'icon';
        icon.textContent = achievement.icon;
        const text = document.createElement('div');
        const name = document.createElement('div');
        name.className = 'name';
        name.textContent = achievement.name;
        const desc = document.createElement('div');
        desc.className = 'desc';
        desc.textContent = achievement.description;
        text.appendChild(name);
        text.appendChild(desc);
        el.appendChild(icon);
        el.appendChild(text);
        achievementsEl.appendChild(el);
      });
    };

    const makeWish = async () => {
      const content = wishInput.value.trim();
      if (!content) {
        setStatus('请先写下心愿', 'error');
        return;
      }
      const res = await fetch('/api/wish', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({ content })
      });
      if (!res.ok) {
        setStatus(await res.text() || '许愿失败', 'error');
        return;
      }
      session = await res.json();
      meritEl.textContent = session.merit;
      renderWishes(session.wishes);
      wishInput.value = '';
      setStatus('心愿已记下', 'ok');
    };

    const toggleAutoTap = async () => {
      const enabled = autoBtn.textContent === '开始';
      const res = await fetch('/api/auto-tap', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          enabled,
          speed: parseFloat(autoSpeedEl.value),
          duration: parseInt(autoDurationEl.value, 10)
        })
      });
      if (!res.ok) {
        setStatus(await res.text() || '操作失败', 'error');
        return;
      }
      session = await res.json();
      autoBtn.textContent = session.isAutoTapping ? '停止' : '开始';
      if (autoPoll) {
        clearInterval(autoPoll);
        autoPoll = null;
      }
      if (session.isAutoTapping) {
        autoPoll = setInterval(() => {
          loadSession().catch(() => {});
          loadStats().catch(() => {});
        }, 2000);
      }
    };

    const saveSettings = async () => {
      const res = await fetch('/api/settings', {
        method: 'POST',
        headers: { 'content-type': 'application/json' },
        body: JSON.stringify({
          volume: parseFloat(volumeEl.value),
          sound: soundEl.value
        })
      });
      if (!res.ok) {
        setStatus('保存设置失败', 'error');
      }
    };

    const checkStorage = async () => {
      const res = await fetch('/api/status');
      if (!res.ok) {
        return;
      }
      const status = await res.json();
      if (status.writeError) {
        setStatus('数据保存失败：' + status.writeError, 'error');
      } else if (status.readError) {
        setStatus('部分数据无法读取，已使用默认值', 'error');
      }
    };

    fishEl.addEventListener('click', (event) => {
      tap(event).catch((err) => setStatus(err.message, 'error'));
    });
    document.getElementById('wish-btn').addEventListener('click', () => {
      makeWish().catch((err) => setStatus(err.message, 'error'));
    });
    autoBtn.addEventListener('click', () => {
      toggleAutoTap().catch((err) => setStatus(err.message, 'error'));
    });
    volumeEl.addEventListener('change', saveSettings);
    soundEl.addEventListener('change', saveSettings);

    setInterval(() => {
      fetch('/api/session')
        .then((res) => res.json())
        .then((data) => { quoteEl.textContent = data.zenQuote; })
        .catch(() => {});
    }, 30000);

    loadSession().catch((err) => setStatus(err.message, 'error'));
    loadStats().catch((err) => setStatus(err.message, 'error'));
    loadAchievements().catch((err) => setStatus(err.message, 'error'));
    checkStorage().catch(() => {});
  </script>
</body>
</html>
"#;
