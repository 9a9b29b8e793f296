//! Built-in copy shown when the operator has not configured a home or about
//! page.

use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Feature {
    pub title: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelHighlight {
    pub name: &'static str,
    pub features: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelCategory {
    pub category: &'static str,
    pub models: &'static [ModelHighlight],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPlan {
    pub title: &'static str,
    pub features: &'static [&'static str],
}

/// Where the landing page's primary button leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallToAction {
    pub label: &'static str,
    pub path: &'static str,
    pub text: &'static str,
    /// Shown to visitors who may already have an account.
    pub login_hint: Option<&'static str>,
}

impl CallToAction {
    pub fn for_login_state(logged_in: bool) -> Self {
        if logged_in {
            Self {
                label: "Try it now",
                path: "/token",
                text: "Start using leading AI services right away.",
                login_hint: None,
            }
        } else {
            Self {
                label: "Sign up free",
                path: "/register",
                text: "Create an account and start using leading AI services.",
                login_hint: Some("Already have an account? Log in at /login"),
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LandingPage {
    pub hero_title: &'static str,
    pub hero_subtitle: &'static str,
    pub features: &'static [Feature],
    pub model_categories: &'static [ModelCategory],
    pub use_cases: &'static [Feature],
    pub pricing_plans: &'static [PricingPlan],
}

pub const LANDING_PAGE: LandingPage = LandingPage {
    hero_title: "A leading AI API integration platform",
    hero_subtitle: "One account for many AI providers. Stable, reliable, billed at list price.",
    features: &[
        Feature {
            title: "Multi-platform integration",
            description: "Qwen, Hunyuan, GLM-4, ERNIE and more behind one account and one API.",
        },
        Feature {
            title: "List-price billing",
            description: "Every model is billed at the provider's official price with no markup.",
        },
        Feature {
            title: "Stable and reliable",
            description: "Multi-line BGP servers, private deployment on request and round-the-clock support.",
        },
        Feature {
            title: "Secure and compliant",
            description: "Data protection, NDAs on request and compliance documentation for enterprises.",
        },
    ],
    model_categories: &[
        ModelCategory {
            category: "General chat",
            models: &[
                ModelHighlight {
                    name: "Qwen 4.0",
                    features: &["200K context", "Chinese-optimised", "Broad knowledge"],
                },
                ModelHighlight {
                    name: "GLM-4",
                    features: &["128K context", "Multimodal", "Strong at code"],
                },
                ModelHighlight {
                    name: "Moonshot Kimi",
                    features: &["32K context", "Math reasoning", "Low cost"],
                },
                ModelHighlight {
                    name: "DeepSeek Chat",
                    features: &["32K context", "Strong at code", "Great value"],
                },
            ],
        },
        ModelCategory {
            category: "Understanding and writing",
            models: &[
                ModelHighlight {
                    name: "ERNIE 4.0",
                    features: &["Broad knowledge", "Chinese writing", "Multimodal"],
                },
                ModelHighlight {
                    name: "Hunyuan",
                    features: &["Fluent dialogue", "General tasks", "Predictable cost"],
                },
                ModelHighlight {
                    name: "Spark 3.0",
                    features: &["Chinese-optimised", "Vertical domains", "Low cost"],
                },
                ModelHighlight {
                    name: "MiniMax",
                    features: &["Fluent dialogue", "Predictable cost", "Fast responses"],
                },
            ],
        },
    ],
    use_cases: &[
        Feature {
            title: "Video production",
            description: "Generate scripts, subtitles, voice-over and music for short videos.",
        },
        Feature {
            title: "Copywriting",
            description: "Draft marketing copy, product descriptions and articles quickly.",
        },
        Feature {
            title: "Software development",
            description: "Code suggestions, bug analysis and fixes.",
        },
        Feature {
            title: "Design",
            description: "Ideas and drafts for logos, posters and UI layouts.",
        },
        Feature {
            title: "Document processing",
            description: "Extract, translate and summarise PDF and Word documents.",
        },
        Feature {
            title: "Search and summaries",
            description: "Condense long material into reports and competitor analyses.",
        },
    ],
    pricing_plans: &[
        PricingPlan {
            title: "Pay as you go",
            features: &[
                "Official list price for every model",
                "Models updated in real time",
                "Prices synced with providers",
                "No minimum spend",
                "Balance never expires",
            ],
        },
        PricingPlan {
            title: "Enterprise",
            features: &[
                "Dedicated technical support",
                "Priority response",
                "Named account contact",
                "NDA available",
                "Private deployment",
            ],
        },
    ],
};

impl LandingPage {
    /// Plain-text rendering for terminals.
    pub fn to_text(&self, cta: &CallToAction) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}\n{}\n", self.hero_title, self.hero_subtitle);

        out.push_str("Why us\n");
        for feature in self.features {
            let _ = writeln!(out, "  * {}: {}", feature.title, feature.description);
        }

        out.push_str("\nModels\n");
        for category in self.model_categories {
            let _ = writeln!(out, "  {}", category.category);
            for model in category.models {
                let _ = writeln!(out, "    - {} ({})", model.name, model.features.join(", "));
            }
        }

        out.push_str("\nUse cases\n");
        for case in self.use_cases {
            let _ = writeln!(out, "  * {}: {}", case.title, case.description);
        }

        out.push_str("\nPricing\n");
        for plan in self.pricing_plans {
            let _ = writeln!(out, "  {}", plan.title);
            for feature in plan.features {
                let _ = writeln!(out, "    - {feature}");
            }
        }

        let _ = writeln!(out, "\n{}\n[{}] -> {}", cta.text, cta.label, cta.path);
        if let Some(hint) = cta.login_hint {
            let _ = writeln!(out, "{hint}");
        }
        out
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AboutPage {
    pub title: &'static str,
    pub introduction: &'static str,
    pub support: &'static str,
    pub support_url: &'static str,
    pub copyright: &'static str,
    pub credit: &'static str,
}

pub const ABOUT_PAGE: AboutPage = AboutPage {
    title: "About us",
    introduction: "NextDreamAPI is an AI API integration platform that gives users a simple way to reach \
                   many mainstream models, with a focus on stable, reliable service.",
    support: "If the project helps you, you can support us here:",
    support_url: "https://afdian.com/leaflet?slug=Nextdream",
    copyright: "NextAPI © 2024 Nextdream. All Rights Reserved.",
    credit: "Created by gtxy27",
};

impl AboutPage {
    pub fn to_text(&self) -> String {
        format!(
            "{}\n\n{}\n\n{} {}\n\n{}\n{}\n",
            self.title, self.introduction, self.support, self.support_url, self.copyright, self.credit
        )
    }
}
