//! 极简SVG节点树
//!
//! 图表片段先构造成节点树，再序列化为字符串，方便测试结构而不是比较文本。

pub const SVG_NAMESPACE: &str = "http://www.w3.org/2000/svg";

#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<SvgNode>,
    pub text: Option<String>,
}

impl SvgNode {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
            text: None,
        }
    }

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.attrs.push((name.to_string(), value.into()));
        self
    }

    pub fn child(mut self, node: SvgNode) -> Self {
        self.children.push(node);
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = SvgNode>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// 深度优先查找所有 class 包含 `class` 的节点
    pub fn find_by_class<'a>(&'a self, class: &str) -> Vec<&'a SvgNode> {
        let mut found = Vec::new();
        self.collect_by_class(class, &mut found);
        found
    }

    fn collect_by_class<'a>(&'a self, class: &str, found: &mut Vec<&'a SvgNode>) {
        if self
            .get_attr("class")
            .map_or(false, |value| value.split_whitespace().any(|c| c == class))
        {
            found.push(self);
        }
        for child in &self.children {
            child.collect_by_class(class, found);
        }
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        self.write_to(&mut out);
        out
    }

    fn write_to(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push_str(&format!(" {}=\"{}\"", name, escape(value)));
        }
        out.push('>');
        if let Some(text) = &self.text {
            out.push_str(&escape(text));
        }
        for child in &self.children {
            child.write_to(out);
        }
        out.push_str(&format!("</{}>", self.tag));
    }
}

/// XML/HTML转义
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 坐标格式化：最多两位小数，去掉多余的0
pub fn fmt_coord(value: f64) -> String {
    if !value.is_finite() {
        return "NaN".to_string();
    }
    let formatted = format!("{:.2}", value);
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}

pub fn translate(x: f64, y: f64) -> String {
    format!("translate({},{})", fmt_coord(x), fmt_coord(y))
}
