use maud::{html, Markup, DOCTYPE};

pub struct PageConfig<'a> {
    pub title: &'a str,
}

pub fn base(config: &PageConfig, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                base href="/";
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (config.title) }

                link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/bulma@1.0.2/css/bulma.min.css";

                script src="https://unpkg.com/htmx.org@1.9.10" {}
            }
            body {
                section class="section pt-3" {
                    div class="container" {
                        h1 class="title" { (config.title) }
                        div id="main-content" {
                            (content)
                        }
                    }
                }
            }
        }
    }
}
