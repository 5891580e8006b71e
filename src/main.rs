use std::error::Error;
use std::fs;
use std::process;

use clap::{ArgGroup, Parser};
use spread_sight::chart::ChartContainer;
use spread_sight::client::{fetch_all, DataSource, FileDataSource, HttpDataSource, MemoryDataSource};
use spread_sight::config::ConfigManager;
use spread_sight::opportunity::OpportunityQuery;
use spread_sight::orderbook::{GeneratorConfig, SeriesGenerator};
use spread_sight::page::render_page;

/// 订单簿价差图表与套利机会页面生成器
#[derive(Parser, Debug)]
#[command(name = "spread_sight", version)]
#[command(about = "Render per-exchange bid/ask charts and arbitrage opportunities as HTML")]
#[command(group(ArgGroup::new("source").required(true).args(["input", "url", "demo"])))]
struct Cli {
    /// TOML配置文件（缺省时尝试 spread_sight.toml，失败则使用默认配置）
    #[arg(long)]
    config: Option<String>,

    /// 快照数组JSON文件
    #[arg(long)]
    input: Option<String>,

    /// 套利机会JSON文件；缺省时从快照中检测
    #[arg(long, requires = "input")]
    opportunities: Option<String>,

    /// 后端地址，覆盖配置中的 client.base_url
    #[arg(long)]
    url: Option<String>,

    /// 生成演示数据（可选数据点数）
    #[arg(long, value_name = "POINTS", num_args = 0..=1, default_missing_value = "60")]
    demo: Option<usize>,

    /// 搜索表单提交后的地址或查询串，例如 "/?min_profit=0.5&limit=20"
    #[arg(long)]
    query: Option<String>,

    #[arg(long)]
    min_profit: Option<f64>,

    #[arg(long)]
    limit: Option<usize>,

    /// 输出HTML文件，缺省写到stdout
    #[arg(long)]
    out: Option<String>,
}

impl Cli {
    fn opportunity_query(&self) -> Result<OpportunityQuery, Box<dyn Error>> {
        let query = match &self.query {
            Some(location) => OpportunityQuery::from_location(location)?,
            None => OpportunityQuery::default(),
        };
        Ok(query.merge(self.min_profit, self.limit))
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path),
        None => ConfigManager::new(),
    };
    if cli.config.is_some() {
        manager.load()?;
    } else {
        manager.load_or_default();
    }

    let mut config = manager.global().clone();
    if let Some(url) = &cli.url {
        config.client.base_url = url.clone();
    }
    spread_sight::init_logging(&config.system);
    log::info!("{} v{} 启动, 配置文件: {}", config.system.name, spread_sight::VERSION, manager.path().display());

    let source: Box<dyn DataSource> = if let Some(points) = cli.demo {
        let series = SeriesGenerator::new(GeneratorConfig::default()).generate(points);
        Box::new(MemoryDataSource::new(series))
    } else if let Some(input) = &cli.input {
        Box::new(FileDataSource::new(input, cli.opportunities.as_ref().map(Into::into)))
    } else {
        Box::new(HttpDataSource::new(&config.client)?)
    };

    let query = cli.opportunity_query()?;
    let (series, opportunities) = fetch_all(source.as_ref(), &query).await?;
    log::info!("收到 {} 个快照, {} 条套利机会", series.len(), opportunities.len());

    let mut container = ChartContainer::new(config.chart.clone());
    container.on_data(&series);

    let page = render_page(&config.system.name, &query, &opportunities, &container);
    match &cli.out {
        Some(path) => {
            fs::write(path, page)?;
            log::info!("页面已写入 {}", path);
        }
        None => println!("{}", page),
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        log::error!("渲染失败: {}", e);
        eprintln!("错误: {}", e);
        process::exit(1);
    }
}
